use crate::geometry::WatermarkRect;

/// Renders the watermark area as the TypeScript snippet consumers paste into
/// their config. The copy action sends this exact string, so formatting here
/// is load-bearing.
pub fn watermark_snippet(rect: &WatermarkRect) -> String {
    format!(
        "export type WatermarkOptions = {{ x: number; y: number; width: number; height: number }};\n\
         \n\
         export const watermark: WatermarkOptions = {{ x: {}, y: {}, width: {}, height: {} }};",
        rect.x, rect.y, rect.width, rect.height
    )
}

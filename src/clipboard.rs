use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use anyhow::{anyhow, Context, Result};
use arboard::Clipboard;
use image::{DynamicImage, RgbaImage};

pub enum DecodeEvent {
    Ready { generation: u64, image: DynamicImage },
    Failed { generation: u64, error: String },
}

impl DecodeEvent {
    fn generation(&self) -> u64 {
        match self {
            DecodeEvent::Ready { generation, .. } | DecodeEvent::Failed { generation, .. } => {
                *generation
            }
        }
    }
}

/// Reads and decodes clipboard images off the UI thread, one worker per paste.
///
/// Each request carries a generation number; `poll` drops completions that are
/// older than the newest request, so a slow decode can never replace the image
/// from a later paste.
pub struct PasteDecoder {
    tx: Sender<DecodeEvent>,
    rx: Receiver<DecodeEvent>,
    latest_generation: u64,
}

impl Default for PasteDecoder {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            latest_generation: 0,
        }
    }
}

impl PasteDecoder {
    pub fn request_paste(&mut self) {
        self.latest_generation += 1;
        let generation = self.latest_generation;
        let tx = self.tx.clone();

        thread::spawn(move || {
            let event = match read_image_from_clipboard() {
                Ok(Some(image)) => DecodeEvent::Ready { generation, image },
                // Paste without image content: not an error, nothing to send.
                Ok(None) => return,
                Err(err) => DecodeEvent::Failed {
                    generation,
                    error: format!("{err:#}"),
                },
            };
            let _ = tx.send(event);
        });
    }

    /// Next fresh completion, if any. Stale generations are discarded.
    pub fn poll(&mut self) -> Option<DecodeEvent> {
        while let Ok(event) = self.rx.try_recv() {
            if event.generation() == self.latest_generation {
                return Some(event);
            }
            log::debug!(
                "discarding stale clipboard decode (generation {} < {})",
                event.generation(),
                self.latest_generation
            );
        }
        None
    }

    #[cfg(test)]
    fn inject(&self, event: DecodeEvent) {
        self.tx.send(event).expect("test channel is open");
    }
}

pub fn read_image_from_clipboard() -> Result<Option<DynamicImage>> {
    let mut clipboard = Clipboard::new().context("cannot initialize clipboard")?;
    match clipboard.get_image() {
        Ok(data) => Ok(Some(image_from_clipboard_data(
            data.width,
            data.height,
            data.bytes.into_owned(),
        )?)),
        // arboard reports "no image on the clipboard" as an error variant.
        Err(arboard::Error::ContentNotAvailable) => Ok(None),
        Err(err) => Err(err).context("cannot read clipboard image"),
    }
}

fn image_from_clipboard_data(width: usize, height: usize, bytes: Vec<u8>) -> Result<DynamicImage> {
    let rgba = RgbaImage::from_raw(width as u32, height as u32, bytes)
        .ok_or_else(|| anyhow!("clipboard image data does not match {width}x{height}"))?;
    Ok(DynamicImage::ImageRgba8(rgba))
}

pub fn write_text(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("cannot initialize clipboard")?;
    clipboard
        .set_text(text.to_owned())
        .context("cannot write text to clipboard")
}

#[cfg(test)]
mod tests {
    use super::{image_from_clipboard_data, DecodeEvent, PasteDecoder};
    use image::DynamicImage;

    #[test]
    fn clipboard_data_conversion_checks_dimensions() {
        let ok = image_from_clipboard_data(2, 2, vec![0u8; 16]).expect("valid rgba");
        assert_eq!(ok.width(), 2);
        assert_eq!(ok.height(), 2);

        assert!(image_from_clipboard_data(3, 2, vec![0u8; 16]).is_err());
    }

    #[test]
    fn poll_discards_stale_generations() {
        let mut decoder = PasteDecoder::default();
        decoder.latest_generation = 2;

        decoder.inject(DecodeEvent::Ready {
            generation: 1,
            image: DynamicImage::new_rgba8(1, 1),
        });
        decoder.inject(DecodeEvent::Ready {
            generation: 2,
            image: DynamicImage::new_rgba8(8, 8),
        });

        match decoder.poll() {
            Some(DecodeEvent::Ready { generation, image }) => {
                assert_eq!(generation, 2);
                assert_eq!(image.width(), 8);
            }
            _ => panic!("expected the fresh decode"),
        }
        assert!(decoder.poll().is_none());
    }

    #[test]
    fn failed_decode_with_stale_generation_is_dropped() {
        let mut decoder = PasteDecoder::default();
        decoder.latest_generation = 5;

        decoder.inject(DecodeEvent::Failed {
            generation: 4,
            error: "too slow".into(),
        });
        assert!(decoder.poll().is_none());
    }
}

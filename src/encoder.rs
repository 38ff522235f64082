use crate::{BitWriter, EncodeError, Picture, RgbaSource, import_rgba, write_framed_stream};
use log::debug;
use std::io::Write;

/// How sources with an alpha channel are treated during import
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AlphaMode {
    /// Fail with [`EncodeError::Unsupported`] if any pixel is not fully opaque
    #[default]
    Reject,

    /// Drop the alpha channel and convert the color channels as they are
    Ignore,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Frame the output as `VP8L` instead of `VP8 `
    pub lossless: bool,
    pub alpha_mode: AlphaMode,
}

impl EncoderConfig {
    pub fn lossy() -> Self {
        Self::default()
    }

    pub fn lossless() -> Self {
        Self {
            lossless: true,
            ..Self::default()
        }
    }

    pub fn with_alpha_mode(mut self, alpha_mode: AlphaMode) -> Self {
        self.alpha_mode = alpha_mode;
        self
    }
}

/// Drives a single encode: import a source once, let the coder fill the bit writer, then
/// [`finish`](Encoder::finish) into a sink.
#[derive(Debug)]
pub struct Encoder {
    config: EncoderConfig,
    picture: Option<Picture>,
    writer: BitWriter,
}

impl Encoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            config,
            picture: None,
            writer: BitWriter::new(config.lossless),
        }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Convert `src` into the encoder's [`Picture`]
    pub fn import<S: RgbaSource + ?Sized>(&mut self, src: &S) -> Result<&Picture, EncodeError> {
        self.check_import()?;

        let picture = import_rgba(src, self.config.alpha_mode)?;

        Ok(self.picture.insert(picture))
    }

    /// Same as [`Encoder::import`], using [`import_rgba_multi_thread`](crate::import_rgba_multi_thread)
    #[cfg(feature = "multi-thread")]
    pub fn import_multi_thread<S: RgbaSource + Sync + ?Sized>(
        &mut self,
        src: &S,
    ) -> Result<&Picture, EncodeError> {
        self.check_import()?;

        let picture = crate::import_rgba_multi_thread(src, self.config.alpha_mode)?;

        Ok(self.picture.insert(picture))
    }

    fn check_import(&self) -> Result<(), EncodeError> {
        if self.picture.is_some() {
            return Err(EncodeError::AlreadyImported);
        }

        if self.writer.is_finished() {
            return Err(EncodeError::WriterFinished);
        }

        Ok(())
    }

    pub fn picture(&self) -> Option<&Picture> {
        self.picture.as_ref()
    }

    pub fn writer(&self) -> &BitWriter {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut BitWriter {
        &mut self.writer
    }

    /// Frame everything written so far and write it to `sink`, returns the number of bytes written
    pub fn finish<W: Write>(mut self, sink: W) -> Result<usize, EncodeError> {
        if self.picture.is_none() {
            debug!("finishing encoder without an imported picture");
        }

        write_framed_stream(&mut self.writer, sink)
    }
}

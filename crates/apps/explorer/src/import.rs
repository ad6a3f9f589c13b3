//! Files dropped onto an explorer window from outside the desktop.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use platform_host::NewFile;

#[derive(Debug, Clone, PartialEq, Eq)]
/// An external file handed to the explorer.
pub struct DroppedFile {
    /// File name without any directory part.
    pub name: String,
    /// MIME type reported by the source, possibly empty.
    pub mime_type: String,
    /// Raw content.
    pub bytes: Vec<u8>,
}

impl DroppedFile {
    /// Creates a dropped file.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    fn is_text(&self) -> bool {
        self.mime_type == "text/plain" || self.name.to_lowercase().ends_with(".txt")
    }

    /// Content to store for this file, sized by the original byte count.
    ///
    /// Images become `data:` URLs, text is stored verbatim and anything else is stored empty.
    /// Text that is not valid UTF-8 cannot be read and yields an error message.
    pub fn to_new_file(&self) -> Result<NewFile, String> {
        let size = self.bytes.len() as u64;
        let content = if self.is_image() {
            data_url(&self.mime_type, &self.bytes)
        } else if self.is_text() {
            String::from_utf8(self.bytes.clone())
                .map_err(|_| format!("Error reading file '{}'", self.name))?
        } else {
            String::new()
        };
        Ok(NewFile::sized(content, size))
    }
}

/// Encodes `bytes` as a base64 `data:` URL.
pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{mime_type};base64,{}", BASE64.encode(bytes))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn images_become_data_urls_with_original_size() {
        let file = DroppedFile::new("dot.png", "image/png", vec![0x89, b'P', b'N', b'G']);
        let new_file = file.to_new_file().expect("image");
        assert_eq!(new_file.content, "data:image/png;base64,iVBORw==");
        assert_eq!(new_file.size, Some(4));
    }

    #[test]
    fn text_by_mime_or_extension_is_kept_verbatim() {
        let by_mime = DroppedFile::new("notes", "text/plain", b"hello".to_vec());
        assert_eq!(by_mime.to_new_file().expect("text").content, "hello");

        let by_name = DroppedFile::new("LOG.TXT", "", b"line".to_vec());
        assert_eq!(by_name.to_new_file().expect("text").content, "line");

        let broken = DroppedFile::new("bad.txt", "text/plain", vec![0xff, 0xfe]);
        assert_eq!(
            broken.to_new_file(),
            Err("Error reading file 'bad.txt'".to_string())
        );
    }

    #[test]
    fn other_files_keep_only_their_size() {
        let file = DroppedFile::new("archive.zip", "application/zip", vec![0; 10]);
        let new_file = file.to_new_file().expect("binary");
        assert_eq!(new_file.content, "");
        assert_eq!(new_file.size, Some(10));
    }
}

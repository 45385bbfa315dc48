//! `upload` command and the file reading shared with `articles`.

use std::{fs, path::Path};

use anyhow::{Context as _, Result};
use sehat_frontend::{http::FilePart, router::Route};

use super::{print_json, Context};

const IMAGE_TYPES: [(&str, &str); 7] = [
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("svg", "image/svg+xml"),
];

/// MIME type from the file extension.
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    IMAGE_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or("application/octet-stream")
}

/// Read `path` into an upload part.
pub fn read_file_part(path: &Path) -> Result<FilePart> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(FilePart {
        file_name,
        mime_type: mime_type_for(path).to_string(),
        bytes,
    })
}

/// Upload `file` and print the stored URL.
pub async fn run(ctx: &Context, file: &Path) -> Result<()> {
    ctx.require(Route::AdminArticleNew)?;
    let part = read_file_part(file)?;
    tracing::info!("uploading {} ({} bytes)", part.file_name, part.bytes.len());
    let uploaded = ctx.api.upload().image(part).await?;
    print_json(&uploaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_follows_extension() {
        assert_eq!(mime_type_for(Path::new("a/b/foto.JPG")), "image/jpeg");
        assert_eq!(mime_type_for(Path::new("ikon.svg")), "image/svg+xml");
        assert_eq!(mime_type_for(Path::new("catatan")), "application/octet-stream");
    }
}

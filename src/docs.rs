use async_std::fs;
use async_std::io::{ReadExt, stdin};
use async_walkdir::{DirEntry, WalkDir};
use futures::FutureExt;
use futures::stream::{self, Stream, TryStreamExt};
use std::io::{Error, ErrorKind, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// `---` on its own or followed by a comment.
fn is_separator(line: &str) -> bool {
    match line.trim_end().strip_prefix("---") {
        Some("") => true,
        Some(rest) => rest.starts_with(char::is_whitespace) && rest.trim_start().starts_with('#'),
        None => false,
    }
}

/// Splits text into the yaml documents separated by `---` lines, skipping blank ones.
pub fn split_documents(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    lines
        .split(|line| is_separator(line))
        .map(|doc| doc.join("\n"))
        .filter(|doc| {
            doc.lines()
                .any(|line| !line.trim().is_empty() && !line.trim_start().starts_with('#'))
        })
        .collect()
}

/// Paths of every non hidden file below dir, sorted
async fn dir_files(dir: &str) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = WalkDir::new(dir)
        .try_filter_map(|dir_entry: DirEntry| async move {
            let path = dir_entry.path();
            let filestem = path
                .file_stem()
                .ok_or_else(|| Error::new(ErrorKind::Other, "No file stem"))?
                .to_string_lossy();
            if path.is_dir() || filestem.starts_with('.') {
                return Ok(None);
            };
            Ok(Some(path))
        })
        .try_collect()
        .await?;
    paths.sort();
    Ok(paths)
}

async fn file_documents(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).await?;
    let docs = split_documents(&text);
    debug!(path = %path.display(), documents = docs.len(), "read entry file");
    Ok(docs)
}

/// Reads documents of dir or file
async fn dir_or_file_documents(pathstr: String) -> Result<Vec<String>> {
    let path = Path::new(&pathstr);
    if path.exists() {
        let metadata = fs::metadata(path).await?;
        if metadata.is_file() {
            file_documents(path).await
        } else if metadata.is_dir() {
            let mut docs = Vec::new();
            for file in dir_files(&pathstr).await? {
                docs.append(&mut file_documents(&file).await?);
            }
            Ok(docs)
        } else {
            Err(Error::new(
                ErrorKind::InvalidInput,
                "The path is neither a file nor a directory.",
            ))
        }
    } else {
        Err(Error::new(
            ErrorKind::NotFound,
            format!("The path {} does not exist.", pathstr),
        ))
    }
}

async fn stdin_documents() -> Result<Vec<String>> {
    let mut text = String::new();
    stdin().read_to_string(&mut text).await?;
    Ok(split_documents(&text))
}

/// Yaml documents of given dir or file, or stdin if None
pub fn documents(path: Option<String>) -> impl Stream<Item = Result<String>> {
    let docs = match path {
        Some(pathstr) => dir_or_file_documents(pathstr).left_future(),
        None => stdin_documents().right_future(),
    };
    docs.into_stream()
        .map_ok(|docs| stream::iter(docs.into_iter().map(Ok)))
        .try_flatten()
}

// Upload ingestion: archive expansion and per-document text extraction.
// Both stages do blocking file I/O; async callers wrap them in spawn_blocking.

pub mod archive;
pub mod reader;

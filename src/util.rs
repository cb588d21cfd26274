use std::fs::File;
use std::io;
use std::path::Path;

pub const GZIP_MAGIC_LEN: usize = 2;
const GZIP_MAGIC: [u8; GZIP_MAGIC_LEN] = [0x1F, 0x8B];

pub fn has_gzip_magic(head: &[u8]) -> bool {
    head.starts_with(&GZIP_MAGIC)
}

pub fn open_file(path: &Path) -> io::Result<File> {
    File::open(path)
}

/// Drop the line terminator in place (`\n`, then `\r`) if present.
pub fn trim_terminator(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
}

//! Archive formats packages can be shipped in.

mod zip;

pub use self::zip::ZipExtractor;

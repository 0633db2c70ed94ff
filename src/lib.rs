pub mod arena;
pub mod constants;
pub mod decode;
pub mod error;
pub mod model;
pub mod num;
pub mod options;
pub mod query;
pub mod skeleton;
pub mod text;

use std::io::Read;
use std::path::Path;

pub use crate::decode::Document;
pub use crate::error::{Error, ErrorKind, Location};
pub use crate::model::SkeletonData;
pub use crate::options::{ParseOptions, ReadOptions};
pub use crate::query::JsonRef;
pub use crate::skeleton::{AttachmentLoader, LoaderError, RegionLoader, SkeletonJson};

pub type Result<T> = std::result::Result<T, Error>;

pub fn parse(input: &str) -> Result<Document> {
    parse_with_options(input, &ParseOptions::default())
}

pub fn parse_with_options(input: &str, options: &ParseOptions) -> Result<Document> {
    decode::from_str(input, options)
}

pub fn parse_slice(input: &[u8]) -> Result<Document> {
    parse_slice_with_options(input, &ParseOptions::default())
}

pub fn parse_slice_with_options(input: &[u8], options: &ParseOptions) -> Result<Document> {
    decode::from_slice(input, options)
}

pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    decode::from_reader(reader, &ParseOptions::default())
}

pub fn read_skeleton_data(json: &str) -> Result<SkeletonData> {
    read_skeleton_data_with_options(json, &ReadOptions::default())
}

pub fn read_skeleton_data_with_options(json: &str, options: &ReadOptions) -> Result<SkeletonData> {
    SkeletonJson::new()
        .with_options(options.clone())
        .read_skeleton_data(json)
}

pub fn read_skeleton_file(path: impl AsRef<Path>) -> Result<SkeletonData> {
    read_skeleton_file_with_options(path, &ReadOptions::default())
}

pub fn read_skeleton_file_with_options(
    path: impl AsRef<Path>,
    options: &ReadOptions,
) -> Result<SkeletonData> {
    SkeletonJson::new()
        .with_options(options.clone())
        .read_skeleton_data_file(path)
}

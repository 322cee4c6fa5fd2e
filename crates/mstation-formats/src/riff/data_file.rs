//! Data files: an optional header followed by one or more subfiles

use tracing::debug;

use crate::cursor::ByteCursor;
use crate::error::{Error, Result};

use super::header::{DATA_FILE_HEADER_SIZE, DATA_FILE_SIGNATURE, DataFileHeader};
use super::subfile::SubFile;

/// A whole data file held in memory
///
/// Context files carry a [`DataFileHeader`]; system files start directly
/// with their first subfile.
#[derive(Debug, Clone, Copy)]
pub struct DataFile<'a> {
    data: &'a [u8],
    header: Option<DataFileHeader>,
}

impl<'a> DataFile<'a> {
    /// Wrap `data`, reading the header first when `has_header` is set
    pub fn parse(data: &'a [u8], has_header: bool) -> Result<Self> {
        let header = if has_header {
            let mut cursor = ByteCursor::new(data);
            let header: DataFileHeader = cursor.read_struct()?;
            if header.signature != DATA_FILE_SIGNATURE {
                return Err(Error::InvalidSignature {
                    offset: 0,
                    expected: DATA_FILE_SIGNATURE,
                    found: header.signature,
                });
            }
            debug!(
                subfiles = header.subfile_count,
                file_size = header.file_size,
                "data file header"
            );
            Some(header)
        } else {
            None
        };
        Ok(Self { data, header })
    }

    /// The file header, if the file has one
    pub fn header(&self) -> Option<&DataFileHeader> {
        self.header.as_ref()
    }

    /// Whether the file holds nothing but its header
    pub fn is_header_only(&self) -> bool {
        self.header.is_some_and(|h| h.is_header_only())
    }

    /// Iterate over the subfiles in file order
    ///
    /// When the file has a header, at most `subfile_count` subfiles are
    /// returned. The iterator stops after the first error.
    pub fn subfiles(&self) -> SubFiles<'a> {
        let (pos, limit) = match self.header {
            Some(h) if h.is_header_only() => (self.data.len(), Some(0)),
            Some(h) => (DATA_FILE_HEADER_SIZE, Some(h.subfile_count as usize)),
            None => (0, None),
        };
        SubFiles {
            data: self.data,
            pos,
            limit,
            failed: false,
        }
    }
}

/// Iterator over the subfiles of a [`DataFile`]
#[derive(Debug, Clone)]
pub struct SubFiles<'a> {
    data: &'a [u8],
    pos: usize,
    limit: Option<usize>,
    failed: bool,
}

impl<'a> Iterator for SubFiles<'a> {
    type Item = Result<SubFile<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.limit == Some(0) {
            return None;
        }
        // Subfiles start on even offsets.
        let start = self.pos + self.pos % 2;
        if start >= self.data.len() {
            return None;
        }
        match SubFile::parse_at(self.data, start) {
            Ok(subfile) => {
                self.pos = subfile.end_offset();
                if let Some(limit) = self.limit.as_mut() {
                    *limit -= 1;
                }
                Some(Ok(subfile))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for SubFiles<'_> {}

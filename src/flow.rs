//! The ordered output container for one segmented document.
//!
//! A [`DocumentFlow`] owns every chunk produced from one source document,
//! stamps each with identity metadata parsed from the filename, and assigns
//! stable sequential identifiers. Chunks are never removed or reordered
//! after being added — insertion order is emission order, which is document
//! reading order.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use sha2::{Digest, Sha256};

use crate::error::DocsegError;
use crate::models::{ChunkRecord, DocumentChunk};

/// Identity metadata parsed once from the upload filename.
///
/// Filename contract: exactly three `_`-separated segments —
/// `<client_name>_<document_name>_<DD-MM-YYYY>`. A trailing file extension
/// is tolerated and stripped before parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentIdentity {
    pub filename: String,
    pub client_name: String,
    pub document_name: String,
    pub date: NaiveDateTime,
}

impl DocumentIdentity {
    /// Parse the filename contract. Fails fast — no silent defaults.
    pub fn parse(filename: &str) -> Result<Self, DocsegError> {
        let stem = filename
            .rsplit_once('.')
            .map(|(stem, ext)| {
                if ext.chars().all(|c| c.is_ascii_alphanumeric()) {
                    stem
                } else {
                    filename
                }
            })
            .unwrap_or(filename);

        let parts: Vec<&str> = stem.split('_').collect();
        let (client_name, document_name, date_part) = match parts.as_slice() {
            [client, document, date] => (*client, *document, *date),
            _ => return Err(DocsegError::InvalidFilename(filename.to_string())),
        };
        let date = NaiveDate::parse_from_str(date_part, "%d-%m-%Y")
            .map_err(|source| DocsegError::InvalidDate {
                value: date_part.to_string(),
                source,
            })?
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Ok(Self {
            filename: filename.to_string(),
            client_name: client_name.to_string(),
            document_name: document_name.to_string(),
            date,
        })
    }
}

/// Ordered, identity-stamped collection of all chunks from one document.
#[derive(Debug)]
pub struct DocumentFlow {
    chunks: Vec<DocumentChunk>,
    identity: DocumentIdentity,
}

impl DocumentFlow {
    pub fn new(identity: DocumentIdentity) -> Self {
        Self {
            chunks: Vec::new(),
            identity,
        }
    }

    /// Parse the filename contract and open an empty flow.
    pub fn from_filename(filename: &str) -> Result<Self, DocsegError> {
        Ok(Self::new(DocumentIdentity::parse(filename)?))
    }

    pub fn identity(&self) -> &DocumentIdentity {
        &self.identity
    }

    /// Accept a finalized chunk: assign `"<filename>_chunk_<index>"`, stamp
    /// the flow's identity metadata and the content hash, and append.
    /// There is no removal or mutation once a chunk is in.
    pub fn add_chunk(&mut self, mut chunk: DocumentChunk) {
        chunk.id = format!("{}_chunk_{}", self.identity.filename, self.chunks.len());
        chunk.client_name = self.identity.client_name.clone();
        chunk.document_name = self.identity.document_name.clone();
        chunk.date = Some(self.identity.date);
        chunk.content_hash = format!("{:x}", Sha256::digest(chunk.content.as_bytes()));
        self.chunks.push(chunk);
    }

    pub fn chunks(&self) -> &[DocumentChunk] {
        &self.chunks
    }

    /// Project every chunk to its flat hand-off record, in emission order.
    pub fn to_records(&self) -> Vec<ChunkRecord> {
        self.chunks
            .iter()
            .map(|chunk| ChunkRecord {
                id: chunk.id.clone(),
                client_name: chunk.client_name.clone(),
                document_name: chunk.document_name.clone(),
                date: self.identity.date.format("%Y-%m-%d %H:%M:%S").to_string(),
                page_number: chunk.page_number,
                content: chunk.content.clone(),
            })
            .collect()
    }
}

impl fmt::Display for DocumentFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, chunk) in self.chunks.iter().enumerate() {
            writeln!(
                f,
                "Chunk: {}, Page Number: {}, Date: {}",
                index, chunk.page_number, self.identity.date
            )?;
            writeln!(f, "{}", chunk.content)?;
            writeln!(f, "{}", "_".repeat(30))?;
        }
        Ok(())
    }
}

//! Perceptual near-duplicate rejection.
//!
//! Each accepted image is fingerprinted; a later image whose fingerprint is
//! within the Hamming threshold of an accepted one is dropped. The ledger is
//! append-only and lives for one document.

use image::RgbaImage;
use img_hash::{HashAlg, HasherConfig, ImageHash};
use tracing::debug;

use crate::config::{DedupConfig, DedupScope, HashAlgorithm};
use crate::error::{ProcessingError, ProcessingResult};

/// A fingerprint as stored in the ledger and in figure records
#[derive(Clone)]
pub struct Fingerprint {
    hash: ImageHash,
}

impl Fingerprint {
    /// Lowercase hex of the hash bits.
    pub fn to_hex(&self) -> String {
        self.hash
            .as_bytes()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    /// Number of differing bits.
    pub fn distance(&self, other: &Fingerprint) -> u32 {
        self.hash.dist(&other.hash)
    }
}

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Fingerprint").field(&self.to_hex()).finish()
    }
}

/// Fingerprints rendered regions
pub struct PerceptualHasher {
    hasher: img_hash::Hasher,
}

impl PerceptualHasher {
    pub fn new(config: &DedupConfig) -> Self {
        let builder = HasherConfig::new()
            .hash_size(config.hash_size, config.hash_size)
            .hash_alg(match config.hash_algorithm {
                HashAlgorithm::Phash | HashAlgorithm::Ahash => HashAlg::Mean,
                HashAlgorithm::Dhash => HashAlg::Gradient,
                HashAlgorithm::Blockhash => HashAlg::Blockhash,
            });
        let builder = match config.hash_algorithm {
            HashAlgorithm::Phash => builder.preproc_dct(),
            _ => builder,
        };

        Self {
            hasher: builder.to_hasher(),
        }
    }

    pub fn fingerprint(&self, image: &RgbaImage) -> ProcessingResult<Fingerprint> {
        // img_hash links its own image version; hand the pixels over raw.
        use img_hash::image::{DynamicImage, ImageBuffer, Rgba};

        let (width, height) = image.dimensions();
        let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_raw(width, height, image.as_raw().clone()).ok_or_else(|| {
                ProcessingError::Fingerprint {
                    message: format!("pixel buffer does not match {}x{}", width, height),
                }
            })?;

        Ok(Fingerprint {
            hash: self.hasher.hash_image(&DynamicImage::ImageRgba8(buffer)),
        })
    }
}

/// Accepted fingerprints of one document
#[derive(Debug)]
pub struct HashLedger {
    threshold: u32,
    scope: DedupScope,
    accepted: Vec<Fingerprint>,
}

impl HashLedger {
    pub fn new(config: &DedupConfig) -> Self {
        Self {
            threshold: config.hash_threshold,
            scope: config.scope,
            accepted: Vec::new(),
        }
    }

    /// Whether `fingerprint` is a near-duplicate of something already accepted.
    pub fn is_duplicate(&self, fingerprint: &Fingerprint) -> bool {
        let within = |kept: &Fingerprint| kept.distance(fingerprint) <= self.threshold;
        match self.scope {
            DedupScope::AllKept => self.accepted.iter().any(within),
            DedupScope::LastKept => self.accepted.last().is_some_and(within),
        }
    }

    /// Accept `fingerprint` unless it duplicates an earlier one.
    ///
    /// Returns `true` if it was recorded.
    pub fn admit(&mut self, fingerprint: Fingerprint) -> bool {
        if self.is_duplicate(&fingerprint) {
            debug!(hash = %fingerprint.to_hex(), "Rejected near-duplicate image");
            return false;
        }
        self.accepted.push(fingerprint);
        true
    }
}

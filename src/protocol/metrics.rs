use std::sync::atomic::{AtomicU64, Ordering};

/// Track codec counters without external dependencies.
pub(crate) struct Metrics;

static MESSAGES_ENCODED: AtomicU64 = AtomicU64::new(0);
static BUNDLES_ENCODED: AtomicU64 = AtomicU64::new(0);
static MESSAGES_DECODED: AtomicU64 = AtomicU64::new(0);
static BUNDLES_DECODED: AtomicU64 = AtomicU64::new(0);
static BYTES_ENCODED: AtomicU64 = AtomicU64::new(0);
static BYTES_DECODED: AtomicU64 = AtomicU64::new(0);
static ENCODE_ERRORS: AtomicU64 = AtomicU64::new(0);
static DECODE_ERRORS: AtomicU64 = AtomicU64::new(0);
static SKIPPED_TAGS: AtomicU64 = AtomicU64::new(0);

/// Top-level packet kind for counting.
#[derive(Clone, Copy)]
pub(crate) enum PacketKind {
    Message,
    Bundle,
}

impl Metrics {
    #[inline]
    pub(crate) fn record_encoded(kind: PacketKind, len: usize) {
        match kind {
            PacketKind::Message => MESSAGES_ENCODED.fetch_add(1, Ordering::Relaxed),
            PacketKind::Bundle => BUNDLES_ENCODED.fetch_add(1, Ordering::Relaxed),
        };
        BYTES_ENCODED.fetch_add(len as u64, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_decoded(kind: PacketKind, len: usize) {
        match kind {
            PacketKind::Message => MESSAGES_DECODED.fetch_add(1, Ordering::Relaxed),
            PacketKind::Bundle => BUNDLES_DECODED.fetch_add(1, Ordering::Relaxed),
        };
        BYTES_DECODED.fetch_add(len as u64, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_encode_error() {
        ENCODE_ERRORS.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_decode_error() {
        DECODE_ERRORS.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_skipped_tag() {
        SKIPPED_TAGS.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn totals() -> MetricsSnapshot {
        MetricsSnapshot {
            messages_encoded: MESSAGES_ENCODED.load(Ordering::Relaxed),
            bundles_encoded: BUNDLES_ENCODED.load(Ordering::Relaxed),
            messages_decoded: MESSAGES_DECODED.load(Ordering::Relaxed),
            bundles_decoded: BUNDLES_DECODED.load(Ordering::Relaxed),
            bytes_encoded: BYTES_ENCODED.load(Ordering::Relaxed),
            bytes_decoded: BYTES_DECODED.load(Ordering::Relaxed),
            encode_errors: ENCODE_ERRORS.load(Ordering::Relaxed),
            decode_errors: DECODE_ERRORS.load(Ordering::Relaxed),
            skipped_tags: SKIPPED_TAGS.load(Ordering::Relaxed),
        }
    }
}

/// Current process-wide codec counters.
///
/// Only top-level packets are counted; elements nested in a bundle are not.
#[must_use]
pub fn snapshot() -> MetricsSnapshot {
    Metrics::totals()
}

/// Lightweight snapshot of codec counters.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Top-level messages encoded
    pub messages_encoded: u64,
    /// Top-level bundles encoded
    pub bundles_encoded: u64,
    /// Top-level messages decoded
    pub messages_decoded: u64,
    /// Top-level bundles decoded
    pub bundles_decoded: u64,
    pub bytes_encoded: u64,
    pub bytes_decoded: u64,
    pub encode_errors: u64,
    pub decode_errors: u64,
    /// Unknown tags dropped in lenient mode
    pub skipped_tags: u64,
}

impl MetricsSnapshot {
    /// Packets encoded, messages and bundles combined.
    #[must_use]
    pub const fn packets_encoded(&self) -> u64 {
        self.messages_encoded + self.bundles_encoded
    }

    /// Packets decoded, messages and bundles combined.
    #[must_use]
    pub const fn packets_decoded(&self) -> u64 {
        self.messages_decoded + self.bundles_decoded
    }

    /// Mean encoded packet size in bytes.
    #[must_use]
    pub fn avg_encoded_size(&self) -> Option<u64> {
        average(self.bytes_encoded, self.packets_encoded())
    }

    /// Mean decoded packet size in bytes.
    #[must_use]
    pub fn avg_decoded_size(&self) -> Option<u64> {
        average(self.bytes_decoded, self.packets_decoded())
    }
}

fn average(total: u64, count: u64) -> Option<u64> {
    if count == 0 {
        return None;
    }
    Some(total / count)
}

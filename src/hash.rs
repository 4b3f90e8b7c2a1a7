//! Content fingerprints of tracks and tempo maps.
//!
//! Both digests are MD5 over a textual rendering, written as lowercase hex.
//! Timestamps render through [`Millis`](crate::model::Millis), so they carry at
//! most three decimals and no trailing zeros.

use itertools::Itertools;
use md5::{Digest, Md5};

use crate::model::{TempoMarker, TimeSignatureMarker, TrackEvent};

/// Digests the `time_type_length` triples of `events`, joined by `:`.
///
/// `events` should already be in canonical order.
#[must_use]
pub fn track_hash(events: &[TrackEvent]) -> String {
    let rendered = events
        .iter()
        .map(|event| {
            format!(
                "{}_{}_{}",
                event.time,
                event.event_type.ordinal(),
                event.length
            )
        })
        .join(":");
    format!("{:x}", Md5::digest(rendered.as_bytes()))
}

/// Digests the `time_bpm` pairs of the tempo map joined by `:`, followed by the
/// time signature values joined by `:`.
#[must_use]
pub fn tempo_map_hash(tempos: &[TempoMarker], time_signatures: &[TimeSignatureMarker]) -> String {
    let mut hasher = Md5::new();
    hasher.update(
        tempos
            .iter()
            .map(|marker| format!("{}_{}", marker.time, marker.bpm))
            .join(":"),
    );
    hasher.update(
        time_signatures
            .iter()
            .map(|signature| signature.value)
            .join(":"),
    );
    format!("{:x}", hasher.finalize())
}

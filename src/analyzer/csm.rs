//! Decoder for raw telemetry records dumped from the CSM region.
//!
//! The throttler firmware writes one 12-byte little-endian record per control
//! loop iteration for its first 500 iterations:
//!
//! ```text
//! offset  0: u32 timer timestamp
//! offset  4: f32 TDP power (bit pattern)
//! offset  8: f32 board power (bit pattern)
//! ```

use super::types::PowerSample;

/// Base address of the CSM telemetry region.
pub const CSM_TELEMETRY_BASE_ADDR: u32 = 0x1006_0000;
/// Last address of the CSM telemetry region.
pub const CSM_TELEMETRY_END_ADDR: u32 = 0x1007_FFFF;
/// Size of the CSM telemetry region in bytes.
pub const CSM_TELEMETRY_SIZE: usize = (CSM_TELEMETRY_END_ADDR - CSM_TELEMETRY_BASE_ADDR + 1) as usize;

/// Bytes per telemetry record.
pub const RECORD_SIZE: usize = 12;
/// Number of records the firmware writes before it stops logging.
pub const MAX_RECORDS: usize = 500;

/// One undecoded record as stored in CSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawRecord {
    pub timestamp: u32,
    pub tdp_bits: u32,
    pub board_bits: u32,
}

impl RawRecord {
    fn from_bytes(chunk: &[u8]) -> Option<Self> {
        let word = |i: usize| chunk.get(i..i + 4).and_then(|b| <[u8; 4]>::try_from(b).ok()).map(u32::from_le_bytes);
        Some(Self {
            timestamp: word(0)?,
            tdp_bits: word(4)?,
            board_bits: word(8)?,
        })
    }

    /// Unwritten CSM reads back as zero.
    pub fn is_blank(&self) -> bool {
        self.timestamp == 0 && self.tdp_bits == 0 && self.board_bits == 0
    }
}

/// Split a dump into raw records.
///
/// Stops at the first blank record or after `MAX_RECORDS`; a trailing partial
/// record is ignored.
pub fn decode_records(bytes: &[u8]) -> Vec<RawRecord> {
    let limit = bytes.len().min(CSM_TELEMETRY_SIZE);
    let records: Vec<RawRecord> = bytes[..limit]
        .chunks_exact(RECORD_SIZE)
        .take(MAX_RECORDS)
        .filter_map(RawRecord::from_bytes)
        .take_while(|r| !r.is_blank())
        .collect();

    if bytes.len() % RECORD_SIZE != 0 && records.len() < MAX_RECORDS {
        log::debug!("Ignoring {} trailing bytes in CSM dump", bytes.len() % RECORD_SIZE);
    }
    records
}

/// Decode a dump into power samples with times in seconds.
///
/// `tick_hz` is the rate of the firmware timer. Timestamps are 32-bit and
/// wrap; each step is taken modulo 2^32 so the time axis stays monotonic.
pub fn decode_power_samples(bytes: &[u8], tick_hz: f64) -> Vec<PowerSample> {
    let records = decode_records(bytes);
    let mut samples = Vec::with_capacity(records.len());
    let mut elapsed_ticks: u64 = 0;
    let mut previous: Option<u32> = None;

    for record in records {
        if let Some(prev) = previous {
            elapsed_ticks += u64::from(record.timestamp.wrapping_sub(prev));
        }
        previous = Some(record.timestamp);

        samples.push(PowerSample {
            time: elapsed_ticks as f64 / tick_hz,
            tdp_power: f64::from(f32::from_bits(record.tdp_bits)),
            board_power: f64::from(f32::from_bits(record.board_bits)),
        });
    }
    samples
}

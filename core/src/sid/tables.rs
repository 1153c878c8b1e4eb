//! Lookup tables shared by every voice/filter instance: ADSR rate periods,
//! the envelope's exponential-decay divisor schedule, and the DAC cutoff
//! nonlinearity. Built once and shared, never mutated at runtime.

/// Clock-cycle period for each of the 16 ADSR rate register values, taken
/// from the measured 6581 envelope generator rate counter thresholds.
pub const RATE_PERIODS: [u16; 16] = [
    9, 32, 63, 95, 149, 220, 267, 313, 392, 977, 1954, 3126, 3907, 11720, 19532, 31251,
];

/// Exponential counter thresholds: once the envelope level drops to or
/// below a threshold, only every Nth rate-counter overflow actually
/// decrements the level (the real chip's piecewise-exponential decay/
/// release curve).
pub const EXPONENTIAL_THRESHOLDS: [(u8, u8); 6] = [
    (0xFF, 1),
    (0x5D, 2),
    (0x36, 4),
    (0x1A, 8),
    (0x0E, 16),
    (0x06, 30),
];

pub fn exponential_divisor(level: u8) -> u8 {
    for &(threshold, divisor) in EXPONENTIAL_THRESHOLDS.iter() {
        if level >= threshold {
            return divisor;
        }
    }
    30
}

/// 11-bit cutoff-frequency DAC nonlinearity table, indexed by the 11-bit
/// FC_HI:FC_LO register pair. Approximated as a DAC transfer curve built
/// from the classic R-2R ladder formula rather than measured chip dumps.
pub fn build_f0_dac(is_8580: bool) -> Vec<f64> {
    let bits = 11;
    let size = 1usize << bits;
    let mut table = Vec::with_capacity(size);
    for value in 0..size {
        let mut sum = 0.0f64;
        for bit in 0..bits {
            if value & (1 << bit) != 0 {
                // 8580's DAC is linear; the 6581's has a measurable
                // nonlinearity that grows with bit position.
                let weight = if is_8580 {
                    (1u32 << bit) as f64
                } else {
                    ((1u32 << bit) as f64).powf(1.0 + 0.0155 * bit as f64) / (1u32 << bit) as f64
                        * (1u32 << bit) as f64
                };
                sum += weight;
            }
        }
        table.push(sum);
    }
    let max = *table.last().unwrap_or(&1.0);
    for v in table.iter_mut() {
        *v /= max.max(1.0);
    }
    table
}

//! Downsamples the SID's native clock rate to the host's output sample
//! rate. Two strategies: a Kaiser-windowed sinc FIR for quality, and a
//! zero-order hold ("fast") resampler that just picks the nearest input.

use std::f64::consts::PI;

/// Modified Bessel function of the first kind, order 0. Used to build the
/// Kaiser window; converges quickly for the beta values used here.
fn bessel_i0(x: f64) -> f64 {
    let mut sum = 1.0;
    let mut term = 1.0;
    let mut k = 1.0;
    let half_x_sq = (x / 2.0) * (x / 2.0);
    while term > sum * 1e-16 {
        term *= half_x_sq / (k * k);
        sum += term;
        k += 1.0;
    }
    sum
}

pub struct SincResampler {
    fir: Vec<f64>,
    fir_n: usize,
    fir_res: usize,
    cycles_per_sample: f64,
    sample_offset: f64,
    ring: Vec<f64>,
    ring_pos: usize,
}

impl SincResampler {
    /// `clock_freq` and `sample_freq` are in Hz; builds a filter whose
    /// stopband attenuation targets the 16-bit noise floor.
    pub fn new(clock_freq: f64, sample_freq: f64) -> Self {
        let cycles_per_sample = clock_freq / sample_freq;
        let halt_freq = (sample_freq / 2.0).min(clock_freq / 2.0 / cycles_per_sample.max(1.0));
        let cutoff = 0.9 * halt_freq / (clock_freq / 2.0);

        let attenuation = -20.0 * (1.0 / 65536.0_f64).log10();
        let beta = if attenuation > 50.0 {
            0.1102 * (attenuation - 8.7)
        } else if attenuation >= 21.0 {
            0.5842 * (attenuation - 21.0).powf(0.4) + 0.07886 * (attenuation - 21.0)
        } else {
            0.0
        };
        let transition_bandwidth = (1.0 - cutoff) * PI;
        let n = (((attenuation - 8.0) / (2.285 * transition_bandwidth)).ceil() as usize).max(8) | 1;

        let fir_res = 1 << 10;
        let fir_n = n;
        let mut fir = vec![0.0; fir_n * fir_res];
        let half = (fir_n / 2) as f64;
        let i0_beta = bessel_i0(beta);

        for phase in 0..fir_res {
            let frac = phase as f64 / fir_res as f64;
            for j in 0..fir_n {
                let t = j as f64 - half + frac;
                let sinc = if t.abs() < 1e-9 { cutoff } else { (cutoff * PI * t).sin() / (PI * t) };
                let window_arg = (1.0 - (t / half).powi(2)).max(0.0);
                let window = bessel_i0(beta * window_arg.sqrt()) / i0_beta;
                fir[phase * fir_n + j] = sinc * window * cutoff;
            }
        }

        SincResampler {
            fir,
            fir_n,
            fir_res,
            cycles_per_sample,
            sample_offset: 0.0,
            ring: vec![0.0; fir_n * 2],
            ring_pos: 0,
        }
    }

    pub fn reset(&mut self) {
        self.sample_offset = 0.0;
        self.ring.iter_mut().for_each(|v| *v = 0.0);
        self.ring_pos = 0;
    }

    /// Feeds one clock-rate sample in. Returns `Some(output_sample)` when
    /// enough input has accumulated to produce an output sample.
    pub fn input(&mut self, sample: f64) -> Option<f64> {
        self.ring[self.ring_pos] = sample;
        self.ring[self.ring_pos + self.fir_n] = sample;
        self.ring_pos = (self.ring_pos + 1) % self.fir_n;

        self.sample_offset -= 1.0;
        if self.sample_offset >= 0.0 {
            return None;
        }

        let sub_phase = -self.sample_offset;
        self.sample_offset += self.cycles_per_sample;

        Some(self.fir(sub_phase))
    }

    fn fir(&self, sub_phase: f64) -> f64 {
        let phase_f = sub_phase * self.fir_res as f64;
        let phase_lo = phase_f.floor() as usize % self.fir_res;
        let phase_hi = (phase_lo + 1) % self.fir_res;
        let frac = phase_f - phase_f.floor();

        let base = self.ring_pos;
        let mut out_lo = 0.0;
        let mut out_hi = 0.0;
        for j in 0..self.fir_n {
            let sample = self.ring[base + j];
            out_lo += sample * self.fir[phase_lo * self.fir_n + j];
            out_hi += sample * self.fir[phase_hi * self.fir_n + j];
        }
        out_lo + (out_hi - out_lo) * frac
    }
}

/// Zero-order hold resampler: just emits the running average of whatever
/// clock-rate samples arrived since the last output, good enough when the
/// host wants speed over fidelity (`fastSampling`).
pub struct FastResampler {
    cycles_per_sample: f64,
    sample_offset: f64,
    accumulator: f64,
    accumulated: u32,
}

impl FastResampler {
    pub fn new(clock_freq: f64, sample_freq: f64) -> Self {
        FastResampler {
            cycles_per_sample: clock_freq / sample_freq,
            sample_offset: 0.0,
            accumulator: 0.0,
            accumulated: 0,
        }
    }

    pub fn reset(&mut self) {
        self.sample_offset = 0.0;
        self.accumulator = 0.0;
        self.accumulated = 0;
    }

    pub fn input(&mut self, sample: f64) -> Option<f64> {
        self.accumulator += sample;
        self.accumulated += 1;
        self.sample_offset -= 1.0;
        if self.sample_offset >= 0.0 {
            return None;
        }
        self.sample_offset += self.cycles_per_sample;
        let output = self.accumulator / self.accumulated as f64;
        self.accumulator = 0.0;
        self.accumulated = 0;
        Some(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sinc_resampler_produces_samples_at_expected_rate() {
        let mut r = SincResampler::new(985_248.0, 44_100.0);
        let mut produced = 0;
        for i in 0..985_248 {
            if r.input((i % 100) as f64).is_some() {
                produced += 1;
            }
        }
        assert!((produced as i64 - 44_100).abs() < 50);
    }

    #[test]
    fn sinc_resampler_passes_a_constant_dc_input_through_unchanged() {
        let mut r = SincResampler::new(985_248.0, 44_100.0);
        let dc = 0.42;
        let mut settled = Vec::new();
        for _ in 0..200_000 {
            if let Some(out) = r.input(dc) {
                settled.push(out);
            }
        }
        // Skip the FIR's warm-up window; every sample produced once the
        // ring buffer is entirely full of `dc` must equal `dc`.
        for &out in settled.iter().skip(200) {
            assert!((out - dc).abs() < 1e-6, "settled DC output {out} must equal input {dc}");
        }
    }

    #[test]
    fn fast_resampler_passes_a_constant_dc_input_through_unchanged() {
        let mut r = FastResampler::new(985_248.0, 44_100.0);
        let dc = -0.17;
        for _ in 0..1000 {
            if let Some(out) = r.input(dc) {
                assert!((out - dc).abs() < 1e-9, "zero-order-hold output must equal the constant input exactly");
            }
        }
    }

    #[test]
    fn fast_resampler_produces_samples_at_expected_rate() {
        let mut r = FastResampler::new(985_248.0, 44_100.0);
        let mut produced = 0;
        for i in 0..985_248 {
            if r.input((i % 100) as f64).is_some() {
                produced += 1;
            }
        }
        assert!((produced as i64 - 44_100).abs() < 50);
    }
}

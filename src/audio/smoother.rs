/// Exponential moving average over a fixed number of bands.
#[derive(Debug, Clone)]
pub struct Ema {
    alpha: f32,
    state: Vec<f32>,
}

impl Ema {
    pub fn new(alpha: f32, bands: usize) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            state: vec![0.0; bands],
        }
    }

    pub fn apply(&mut self, input: &[f32]) -> &[f32] {
        for (s, &x) in self.state.iter_mut().zip(input) {
            *s = self.alpha * x + (1.0 - self.alpha) * *s;
        }
        &self.state
    }
}

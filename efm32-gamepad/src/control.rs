/// Runtime control of an audio output (e.g. the DAC tone generator).
pub trait AudioControl {
    /// Error type for control operations.
    type Error;

    /// Start producing output.
    fn enable(&mut self) -> Result<(), Self::Error>;

    /// Silence the output. Configuration is kept for the next `enable`.
    fn disable(&mut self) -> Result<(), Self::Error>;

    /// Set the output level (0.0 = silent, 1.0 = full scale). Values outside
    /// the range are clamped.
    fn volume(&mut self, level: f32) -> Result<(), Self::Error>;

    /// Whether output is currently being produced.
    fn is_enabled(&self) -> bool;
}

use anyhow::Error as Anyhow;

/// Trait for configuration that assembles a value at runtime.
pub trait Build {
    /// The type assembled from this configuration.
    type Output;

    /// Assembles [`Build::Output`], consuming the configuration.
    fn build(self) -> Result<Self::Output, Anyhow>;
}

/// Options for controlling a pruning call
#[derive(Clone, Debug)]
pub struct PruneOptions {
    for_insert: bool,
    emit_roaring: bool,
}

impl PruneOptions {
    /// Create a new builder for PruneOptions
    ///
    /// # Example
    /// ```
    /// use paling::PruneOptions;
    ///
    /// let options = PruneOptions::builder()
    ///     .for_insert(true)
    ///     .emit_roaring(false)
    ///     .build();
    /// ```
    pub fn builder() -> PruneOptionsBuilder {
        PruneOptionsBuilder::default()
    }

    /// Check if eager constant evaluation (insert routing) is enabled
    pub fn for_insert(&self) -> bool {
        self.for_insert
    }

    /// Check if roaring bitmap output is enabled
    pub fn emit_roaring(&self) -> bool {
        self.emit_roaring
    }
}

impl Default for PruneOptions {
    fn default() -> Self {
        Self {
            for_insert: false,
            emit_roaring: false,
        }
    }
}

/// Builder for PruneOptions
#[derive(Clone, Debug, Default)]
pub struct PruneOptionsBuilder {
    for_insert: Option<bool>,
    emit_roaring: Option<bool>,
}

impl PruneOptionsBuilder {
    /// Enable or disable eager constant evaluation (default: false)
    ///
    /// Insert routing walks a bare key value against the scheme; a plain
    /// planning walk must not resolve bare constants, because no execution
    /// context exists to evaluate them against.
    pub fn for_insert(mut self, value: bool) -> Self {
        self.for_insert = Some(value);
        self
    }

    /// Enable or disable roaring bitmap output (default: false)
    ///
    /// When enabled, the result carries a RoaringBitmap of the candidate
    /// partition indexes, a compact format for planners that cache or ship
    /// candidate sets around.
    pub fn emit_roaring(mut self, value: bool) -> Self {
        self.emit_roaring = Some(value);
        self
    }

    /// Build the PruneOptions
    pub fn build(self) -> PruneOptions {
        let defaults = PruneOptions::default();
        PruneOptions {
            for_insert: self.for_insert.unwrap_or(defaults.for_insert),
            emit_roaring: self.emit_roaring.unwrap_or(defaults.emit_roaring),
        }
    }
}

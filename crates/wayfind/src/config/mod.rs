use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Relevance weights must sum to approximately 1.0, got {0}")]
    WeightSum(f64),
    #[error("Name weight ({name}) must not be below label weight ({label})")]
    WeightOrder { name: f64, label: f64 },
    #[error("{field} must be within (0, 1), got {value}")]
    OutOfUnitRange { field: &'static str, value: f64 },
    #[error("Page size must be greater than zero")]
    ZeroPageSize,
}

/// Relative weights of the two relevance signals.
///
/// Name/headline matches always weigh at least as much as label matches, so an
/// exact name match never scores below a label-only match.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelevanceWeights {
    pub name_weight: f64,
    pub label_weight: f64,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        Self {
            name_weight: 0.7,
            label_weight: 0.3,
        }
    }
}

/// Tunables for filtering, scoring and pagination.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct RankingConfig {
    /// Page size used when the request does not specify one
    pub default_page_size: usize,
    /// Requests asking for larger pages are clamped to this
    pub max_page_size: usize,
    /// Score given to every candidate when the query is empty
    pub neutral_relevance: f64,
    /// Floor applied to non-empty query scores
    pub relevance_epsilon: f64,
    pub weights: RelevanceWeights,
    /// Results within this distance are reported in the `Nearby` section
    pub nearby_radius_miles: f64,
    /// Service radius assumed for travelling providers that do not set one
    pub default_service_radius_miles: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            neutral_relevance: 0.5,
            relevance_epsilon: 0.01,
            weights: RelevanceWeights::default(),
            nearby_radius_miles: 25.0,
            default_service_radius_miles: 25.0,
        }
    }
}

impl RankingConfig {
    pub fn builder() -> RankingConfigBuilder {
        RankingConfigBuilder::new()
    }

    /// Resolves the effective page size for a request.
    #[must_use]
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested
            .filter(|size| *size > 0)
            .unwrap_or(self.default_page_size)
            .min(self.max_page_size)
            .max(1)
    }
}

/// Builder for creating ranking configurations with ergonomic defaults
#[derive(Debug, Clone, Default)]
pub struct RankingConfigBuilder {
    config: RankingConfig,
}

impl RankingConfigBuilder {
    /// Create a new builder with provider directory defaults
    pub fn new() -> Self {
        Self {
            config: RankingConfig::default(),
        }
    }

    /// Defaults for the provider directory (families searching for care)
    pub fn directory() -> Self {
        Self::new()
    }

    /// Defaults for the job board: skills and job types carry more weight and
    /// commutes are longer
    pub fn job_board() -> Self {
        let mut builder = Self::new();
        builder.config.weights = RelevanceWeights {
            name_weight: 0.6,
            label_weight: 0.4,
        };
        builder.config.nearby_radius_miles = 50.0;
        builder
    }

    /// Set the page size used when a request leaves it unset
    pub fn default_page_size(mut self, size: usize) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        self.config.default_page_size = size;
        Ok(self)
    }

    /// Set the largest page a request may ask for
    pub fn max_page_size(mut self, size: usize) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        self.config.max_page_size = size;
        Ok(self)
    }

    /// Set the score every candidate receives for an empty query
    pub fn neutral_relevance(mut self, score: f64) -> Result<Self, ConfigError> {
        self.config.neutral_relevance = unit_interval("neutral_relevance", score)?;
        Ok(self)
    }

    /// Set the minimum score of a non-matching candidate
    pub fn relevance_epsilon(mut self, epsilon: f64) -> Result<Self, ConfigError> {
        self.config.relevance_epsilon = unit_interval("relevance_epsilon", epsilon)?;
        Ok(self)
    }

    /// Set custom relevance weights (must sum to approximately 1.0)
    pub fn relevance_weights(mut self, name: f64, label: f64) -> Result<Self, ConfigError> {
        let total = name + label;
        if !total.is_finite() || (total - 1.0).abs() > 0.1 {
            return Err(ConfigError::WeightSum(total));
        }
        if name < label || label < 0.0 {
            return Err(ConfigError::WeightOrder { name, label });
        }

        self.config.weights = RelevanceWeights {
            name_weight: name,
            label_weight: label,
        };
        Ok(self)
    }

    /// Set the radius used for the `Nearby` result section
    pub fn nearby_radius(mut self, miles: f64) -> Self {
        self.config.nearby_radius_miles = miles.max(0.0);
        self
    }

    /// Set the service radius assumed for providers without one
    pub fn default_service_radius(mut self, miles: f64) -> Self {
        self.config.default_service_radius_miles = miles.max(0.0);
        self
    }

    /// Build the final configuration
    pub fn build(self) -> RankingConfig {
        self.config
    }
}

fn unit_interval(field: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value > 0.0 && value < 1.0 {
        Ok(value)
    } else {
        Err(ConfigError::OutOfUnitRange { field, value })
    }
}

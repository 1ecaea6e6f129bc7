//! Native allocator compliance: which entry points need the shim.
//!
//! The build configuration decides, per entry point, whether the native
//! primitive already returns a freeable pointer for a zero-size request.
//! [`ShimConfig`] carries that verdict. It can come from cargo features,
//! from the environment, or from a runtime [`probe`](crate::probe::probe).

use std::error::Error;
use std::fmt;
use std::str::FromStr;

use crate::dispatch::Selection;
use crate::probe::ProbeReport;

/// Environment variable overriding the allocate verdict.
pub const ENV_NATIVE_MALLOC: &str = "RPLALLOC_NATIVE_MALLOC";

/// Environment variable overriding the resize verdict.
pub const ENV_NATIVE_REALLOC: &str = "RPLALLOC_NATIVE_REALLOC";

// ── Compliance ─────────────────────────────────────────────────────

/// Whether a native entry point honours zero-size requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Compliance {
    /// Known to return a freeable pointer for size 0.
    Compliant,
    /// Known to return null for size 0.
    NonCompliant,
    /// The build configuration could not tell.
    #[default]
    Unknown,
}

impl Compliance {
    /// Native only when known-compliant; otherwise the shim.
    pub const fn selection(self) -> Selection {
        match self {
            Self::Compliant => Selection::Native,
            Self::NonCompliant | Self::Unknown => Selection::Shim,
        }
    }

    const fn from_flag(compliant: bool) -> Self {
        if compliant {
            Self::Compliant
        } else {
            Self::Unknown
        }
    }
}

impl fmt::Display for Compliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compliant => write!(f, "compliant"),
            Self::NonCompliant => write!(f, "noncompliant"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl FromStr for Compliance {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compliant" => Ok(Self::Compliant),
            "noncompliant" | "non-compliant" => Ok(Self::NonCompliant),
            "unknown" | "" => Ok(Self::Unknown),
            _ => Err(()),
        }
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while reading a [`ShimConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable held something other than a compliance value.
    InvalidCompliance {
        /// The variable name.
        var: &'static str,
        /// The value found.
        value: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCompliance { var, value } => write!(
                f,
                "{var}={value:?}: expected one of compliant, noncompliant, unknown"
            ),
        }
    }
}

impl Error for ConfigError {}

// ── ShimConfig ─────────────────────────────────────────────────────

/// Per-entry-point compliance of the native allocator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShimConfig {
    /// Native `malloc(0)` behaviour.
    pub allocate: Compliance,
    /// Native `realloc(NULL, 0)` behaviour.
    pub resize: Compliance,
}

impl ShimConfig {
    /// Both entry points shimmed.
    pub const SHIM_ALL: Self = Self {
        allocate: Compliance::NonCompliant,
        resize: Compliance::NonCompliant,
    };

    /// Both entry points native.
    pub const NATIVE_ALL: Self = Self {
        allocate: Compliance::Compliant,
        resize: Compliance::Compliant,
    };

    /// The verdict compiled in through the `native-malloc-compliant` and
    /// `native-realloc-compliant` features. A missing feature means
    /// [`Compliance::Unknown`].
    pub const fn from_features() -> Self {
        Self {
            allocate: Compliance::from_flag(cfg!(feature = "native-malloc-compliant")),
            resize: Compliance::from_flag(cfg!(feature = "native-realloc-compliant")),
        }
    }

    /// [`from_features`](Self::from_features), overridden by
    /// [`ENV_NATIVE_MALLOC`] and [`ENV_NATIVE_REALLOC`] when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`from_env`](Self::from_env) with a caller-supplied lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::from_features();
        if let Some(c) = read_var(&lookup, ENV_NATIVE_MALLOC)? {
            config.allocate = c;
        }
        if let Some(c) = read_var(&lookup, ENV_NATIVE_REALLOC)? {
            config.resize = c;
        }
        log::debug!(
            "shim config: allocate={} resize={}",
            config.allocate,
            config.resize
        );
        Ok(config)
    }

    /// Replace [`Compliance::Unknown`] entries with a probe's findings.
    ///
    /// Known verdicts are kept even when the probe disagrees.
    pub fn resolve_unknown(self, report: &ProbeReport) -> Self {
        let resolved = Self {
            allocate: resolve(self.allocate, report.allocate),
            resize: resolve(self.resize, report.resize),
        };
        if resolved != self {
            log::debug!(
                "shim config resolved by probe: allocate={} resize={}",
                resolved.allocate,
                resolved.resize
            );
        }
        resolved
    }

    /// Whether any entry point is routed through the shim.
    pub fn any_shimmed(&self) -> bool {
        self.allocate.selection() == Selection::Shim || self.resize.selection() == Selection::Shim
    }
}

fn read_var<F>(lookup: &F, var: &'static str) -> Result<Option<Compliance>, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|()| ConfigError::InvalidCompliance { var, value }),
    }
}

fn resolve(configured: Compliance, probed: Compliance) -> Compliance {
    match configured {
        Compliance::Unknown => probed,
        known => known,
    }
}

//! Sizes
//!
//! A size is a named capacity tier. Compute sizes (containers and servers)
//! pack their CPU and memory into the value as `"<cpu units>-<memory MiB>"`;
//! the human-readable figures are derived once when the size is fetched.

use super::endpoint::{Endpoint, Params};
use super::flex;
use crate::error::{Result, SpinupError};
use serde::{Deserialize, Serialize};

/// The name/value/price view every size exposes
pub trait Size {
    fn name(&self) -> &str;
    fn value(&self) -> &str;
    fn price(&self) -> &str;

    /// Sizes priced with the literal `tryit` label are free trial tiers
    fn is_tryit(&self) -> bool {
        self.price() == "tryit"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseSize {
    #[serde(default, deserialize_with = "flex::int")]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "flex::int")]
    pub type_id: i64,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub price: String,
}

impl Size for BaseSize {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn price(&self) -> &str {
        &self.price
    }
}

impl Endpoint for BaseSize {
    fn path(params: &Params) -> Result<String> {
        Ok(format!("/sizes/{}", params.segment("id")?))
    }
}

/// A size with derived CPU and memory figures
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComputeSize {
    #[serde(flatten)]
    pub base: BaseSize,
    pub cpu: String,
    pub memory: String,
}

pub type ServerSize = ComputeSize;

impl ComputeSize {
    /// Derive CPU/memory from the packed value; an empty value leaves both empty
    pub fn from_base(base: BaseSize) -> Result<Self> {
        let (cpu, memory) = if base.value.is_empty() {
            (String::new(), String::new())
        } else {
            let (c, m) = base.value.split_once('-').ok_or_else(|| {
                SpinupError::decode(
                    format!("size {}", base.id),
                    format!("value {:?} is not <cpu>-<memory>", base.value),
                )
            })?;
            let c: f64 = c
                .trim()
                .parse()
                .map_err(|e| SpinupError::decode(format!("size {} cpu", base.id), e))?;
            let m: f64 = m
                .trim()
                .parse()
                .map_err(|e| SpinupError::decode(format!("size {} memory", base.id), e))?;
            (format!("{} vCPU", c / 1024.0), format!("{} GB", m / 1024.0))
        };

        Ok(Self { base, cpu, memory })
    }
}

impl Size for ComputeSize {
    fn name(&self) -> &str {
        &self.base.name
    }

    fn value(&self) -> &str {
        &self.base.value
    }

    fn price(&self) -> &str {
        &self.base.price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(value: &str) -> BaseSize {
        BaseSize {
            id: 4,
            name: "small".to_string(),
            value: value.to_string(),
            price: "$0.05/hr".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_compute_size_derivation() {
        let size = ComputeSize::from_base(base("512-1024")).unwrap();
        assert_eq!(size.cpu, "0.5 vCPU");
        assert_eq!(size.memory, "1 GB");

        let size = ComputeSize::from_base(base("2048-8192")).unwrap();
        assert_eq!(size.cpu, "2 vCPU");
        assert_eq!(size.memory, "8 GB");
    }

    #[test]
    fn test_compute_size_empty_value() {
        let size = ComputeSize::from_base(base("")).unwrap();
        assert!(size.cpu.is_empty());
        assert!(size.memory.is_empty());
    }

    #[test]
    fn test_compute_size_malformed_value() {
        assert!(ComputeSize::from_base(base("1024")).is_err());
        assert!(ComputeSize::from_base(base("a-b")).is_err());
    }

    #[test]
    fn test_tryit() {
        let mut b = base("");
        assert!(!b.is_tryit());
        b.price = "tryit".to_string();
        assert!(b.is_tryit());
    }

    #[test]
    fn test_compute_size_serializes_flat() {
        let size = ComputeSize::from_base(base("1024-2048")).unwrap();
        let v = serde_json::to_value(&size).unwrap();
        assert_eq!(v["name"], "small");
        assert_eq!(v["cpu"], "1 vCPU");
        assert_eq!(v["memory"], "2 GB");
    }
}

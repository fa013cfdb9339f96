//! WiFi Band and Channel Resolution
//!
//! This crate turns the band and channel selections of a scan request into
//! the concrete frequency sets used by the scan orchestrator:
//!
//! - **Scan set**: the frequencies commanded to the radio driver
//! - **Valid set**: the frequencies accepted in returned results
//!
//! Both sets are resolved through a [`FrequencyTable`], which maps each
//! sub-band (2.4 GHz, 5 GHz, 5 GHz DFS) to its regulatory frequencies.
//!
//! # Example
//!
//! ```rust
//! use airscan_channels::{ChannelCollection, FrequencyTable, ValidFrequencyPolicy, WifiBand};
//!
//! let table = FrequencyTable::standard();
//! let mut collection = ChannelCollection::new(&table, ValidFrequencyPolicy::MatchScan);
//! collection.add_band(WifiBand::Band24Ghz);
//! collection.add_channel(5180);
//!
//! let freqs = collection.scan_frequencies();
//! assert!(freqs.contains(&2412));
//! assert!(freqs.contains(&5180));
//! ```

pub mod band;
pub mod channel;
pub mod collection;
pub mod error;

pub use band::{FrequencySet, FrequencyTable, WifiBand};
pub use channel::{channel_to_frequency, frequency_to_channel};
pub use collection::{ChannelCollection, ValidFrequencyPolicy};
pub use error::ChannelError;

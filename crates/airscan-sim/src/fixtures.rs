//! Deterministic scan results for tests

use airscan_core::ScanResult;

/// Create one result per frequency
///
/// The same `seed` always yields the same SSIDs, BSSIDs and RSSI values, so
/// tests can assert on ordering without hardcoding every result.
pub fn create_results(seed: u32, timestamp_us: u64, frequencies: &[u32]) -> Vec<ScanResult> {
    frequencies
        .iter()
        .enumerate()
        .map(|(i, &frequency)| {
            let i = i as u32;
            let mix = seed.wrapping_mul(31).wrapping_add(i.wrapping_mul(17));
            let rssi = -30 - (mix % 61) as i32;
            ScanResult::new(
                format!("TEST AP {}-{}", seed, i),
                format!(
                    "02:00:{:02x}:{:02x}:{:02x}:{:02x}",
                    (seed >> 8) & 0xff,
                    seed & 0xff,
                    (i >> 8) & 0xff,
                    i & 0xff
                ),
                rssi,
                frequency,
                timestamp_us,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let a = create_results(7, 100, &[2400, 2450, 2400]);
        let b = create_results(7, 100, &[2400, 2450, 2400]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert_eq!(a[1].frequency, 2450);
        assert!(a.iter().all(|r| r.timestamp_us == 100));
        assert!(a.iter().all(|r| (-90..=-30).contains(&r.rssi)));
    }

    #[test]
    fn test_bssids_unique_within_set() {
        let results = create_results(3, 0, &[2400; 20]);
        let mut bssids: Vec<&str> = results.iter().map(|r| r.bssid.as_str()).collect();
        bssids.sort();
        bssids.dedup();
        assert_eq!(bssids.len(), 20);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_one_result_per_frequency(
                seed in any::<u32>(),
                freqs in prop::collection::vec(2400u32..6000, 0..40),
            ) {
                let results = create_results(seed, 42, &freqs);
                prop_assert_eq!(results.len(), freqs.len());
                for (result, freq) in results.iter().zip(&freqs) {
                    prop_assert_eq!(result.frequency, *freq);
                    prop_assert!((-90..=-30).contains(&result.rssi));
                }
            }
        }
    }
}

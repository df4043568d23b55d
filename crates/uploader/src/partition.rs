//! Asset-to-unit partitioning.
//!
//! Pure and deterministic: concatenating the produced units' assets yields
//! the input sequence exactly, and no unit is ever empty.

use shotput_protocol::types::AssetDescriptor;

use crate::config::PartitionPolicy;

/// One submission to the transfer backend, covering one or many assets.
///
/// `index` is the unit's stable identity for the run: it addresses the
/// matching record in `UploadState::uploads` even after the backend assigns
/// a real transfer id.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferUnit {
    pub index: usize,
    pub assets: Vec<AssetDescriptor>,
}

impl TransferUnit {
    /// Local placeholder id used until the backend assigns a real one.
    pub fn placeholder_id(&self) -> String {
        format!("unit-{}", self.index)
    }

    /// Human-readable label: the filename for single-asset units, a
    /// synthesized batch label otherwise.
    pub fn display_name(&self) -> String {
        if self.assets.len() == 1 {
            self.assets[0].filename.clone()
        } else {
            format!("batch {} ({} files)", self.index + 1, self.assets.len())
        }
    }
}

/// Partitions `assets` into ordered transfer units.
///
/// `PerFile` yields one unit per asset; `Batch(size)` yields
/// `ceil(N / size)` units with the last possibly short. Order is preserved.
pub fn partition(assets: &[AssetDescriptor], policy: PartitionPolicy) -> Vec<TransferUnit> {
    let group_size = match policy {
        PartitionPolicy::PerFile => 1,
        PartitionPolicy::Batch(size) => size.max(1),
    };

    assets
        .chunks(group_size)
        .enumerate()
        .map(|(index, chunk)| TransferUnit {
            index,
            assets: chunk.to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn assets(n: usize) -> Vec<AssetDescriptor> {
        (0..n)
            .map(|i| AssetDescriptor {
                id: format!("asset-{i}"),
                filename: format!("IMG_{i:04}.png"),
                locator: format!("file:///screenshots/IMG_{i:04}.png"),
                width: 0,
                height: 0,
                byte_size: 0,
                created_at: Utc::now(),
                modified_at: Utc::now(),
            })
            .collect()
    }

    #[test]
    fn per_file_yields_one_unit_per_asset() {
        let input = assets(3);
        let units = partition(&input, PartitionPolicy::PerFile);
        assert_eq!(units.len(), 3);
        for (i, unit) in units.iter().enumerate() {
            assert_eq!(unit.index, i);
            assert_eq!(unit.assets.len(), 1);
            assert_eq!(unit.assets[0], input[i]);
        }
    }

    #[test]
    fn batch_of_20_splits_25_into_20_and_5() {
        let input = assets(25);
        let units = partition(&input, PartitionPolicy::Batch(20));
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].assets.len(), 20);
        assert_eq!(units[1].assets.len(), 5);
    }

    #[test]
    fn concatenated_units_equal_input_in_order() {
        let input = assets(17);
        for policy in [
            PartitionPolicy::PerFile,
            PartitionPolicy::Batch(4),
            PartitionPolicy::Batch(17),
            PartitionPolicy::Batch(100),
        ] {
            let units = partition(&input, policy);
            let flattened: Vec<_> = units.iter().flat_map(|u| u.assets.clone()).collect();
            assert_eq!(flattened, input, "policy {policy:?}");
            assert!(units.iter().all(|u| !u.assets.is_empty()));
        }
    }

    #[test]
    fn batch_size_zero_is_clamped() {
        let input = assets(3);
        let units = partition(&input, PartitionPolicy::Batch(0));
        assert_eq!(units.len(), 3);
    }

    #[test]
    fn empty_input_yields_no_units() {
        let units = partition(&[], PartitionPolicy::Batch(20));
        assert!(units.is_empty());
    }

    #[test]
    fn display_names() {
        let input = assets(5);
        let per_file = partition(&input, PartitionPolicy::PerFile);
        assert_eq!(per_file[0].display_name(), "IMG_0000.png");

        let batched = partition(&input, PartitionPolicy::Batch(3));
        assert_eq!(batched[0].display_name(), "batch 1 (3 files)");
        assert_eq!(batched[1].display_name(), "batch 2 (2 files)");
    }

    #[test]
    fn placeholder_ids_follow_index() {
        let input = assets(2);
        let units = partition(&input, PartitionPolicy::PerFile);
        assert_eq!(units[0].placeholder_id(), "unit-0");
        assert_eq!(units[1].placeholder_id(), "unit-1");
    }
}

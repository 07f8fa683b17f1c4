use proptest::prelude::*;
use threadshape_core::traits::{ArtifactStore, ArtifactStoreExt};
use threadshape_core::types::{ArtifactKey, Tensor3};
use threadshape_storage::{MemoryArtifactStore, SqliteArtifactStore};

fn tensor_strategy() -> impl Strategy<Value = Tensor3> {
    (1usize..4, 1usize..6, 1usize..5).prop_flat_map(|(h, c, f)| {
        prop::collection::vec(-1.0e6f64..1.0e6, h * c * f)
            .prop_map(move |data| Tensor3::from_vec([h, c, f], data).unwrap())
    })
}

proptest! {
    #[test]
    fn raw_bytes_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let store = SqliteArtifactStore::open_in_memory().unwrap();
        store.put_raw(ArtifactKey::Tensor, &bytes).unwrap();
        prop_assert_eq!(store.get_raw(ArtifactKey::Tensor).unwrap(), bytes);
    }

    #[test]
    fn tensor_round_trips(tensor in tensor_strategy()) {
        let store = MemoryArtifactStore::new();
        store.put(ArtifactKey::Tensor, &tensor).unwrap();
        let back: Tensor3 = store.get(ArtifactKey::Tensor).unwrap();
        prop_assert_eq!(back, tensor);
    }

    #[test]
    fn label_tables_round_trip(labels in prop::collection::vec("[a-z]{1,8}", 0..50)) {
        let store = SqliteArtifactStore::open_in_memory().unwrap();
        store.put(ArtifactKey::GroupLabels, &labels).unwrap();
        let back: Vec<String> = store.get(ArtifactKey::GroupLabels).unwrap();
        prop_assert_eq!(back, labels);
    }
}

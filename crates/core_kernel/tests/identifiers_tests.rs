//! Unit tests for the Identifiers module

use core_kernel::{ClaimId, OutboxEventId};
use uuid::Uuid;

mod claim_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        assert_ne!(ClaimId::new(), ClaimId::new());
    }

    #[test]
    fn test_new_is_v4() {
        assert_eq!(ClaimId::new().as_uuid().get_version_num(), 4);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = ClaimId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_display_has_prefix() {
        let id = ClaimId::new();
        assert_eq!(id.to_string(), format!("CLM-{}", id.as_uuid()));
        assert_eq!(ClaimId::PREFIX, "CLM");
    }

    #[test]
    fn test_parse_with_and_without_prefix() {
        let id = ClaimId::new();
        assert_eq!(id.to_string().parse::<ClaimId>().unwrap(), id);
        assert_eq!(id.as_uuid().to_string().parse::<ClaimId>().unwrap(), id);
    }

    #[test]
    fn test_parse_invalid() {
        assert!("CLM-not-a-uuid".parse::<ClaimId>().is_err());
    }

    #[test]
    fn test_serializes_as_bare_uuid() {
        let id = ClaimId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }
}

mod outbox_event_id_tests {
    use super::*;

    #[test]
    fn test_v7_ids_are_time_ordered() {
        let id1 = OutboxEventId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = OutboxEventId::new();
        let uuid1: Uuid = id1.into();
        let uuid2: Uuid = id2.into();
        assert!(uuid1 < uuid2);
    }

    #[test]
    fn test_display_prefix() {
        assert!(OutboxEventId::new().to_string().starts_with("EVT-"));
    }
}

use parcel_core::{Parcel, ParcelStatus};

#[test]
fn parcel_serialization_uses_plain_status_text() {
    let mut parcel = Parcel::new(1000, "Lenina 5", "2026-10-16T10:00:00Z");
    parcel.number = 17;

    let json = serde_json::to_value(&parcel).unwrap();
    assert_eq!(json["number"], 17);
    assert_eq!(json["client"], 1000);
    assert_eq!(json["status"], "registered");
    assert_eq!(json["address"], "Lenina 5");
    assert_eq!(json["created_at"], "2026-10-16T10:00:00Z");

    let decoded: Parcel = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, parcel);
}

#[test]
fn unknown_status_survives_serialization() {
    let status: ParcelStatus = serde_json::from_str("\"held_at_customs\"").unwrap();
    assert!(matches!(
        status,
        ParcelStatus::Other(ref other) if other.as_str() == "held_at_customs"
    ));
    assert_eq!(
        serde_json::to_string(&status).unwrap(),
        "\"held_at_customs\""
    );
}

#[test]
fn known_status_text_deserializes_to_known_variant() {
    let status: ParcelStatus = serde_json::from_str("\"registered\"").unwrap();
    assert_eq!(status, ParcelStatus::Registered);
    assert!(status.is_registered());
}

#[test]
fn only_registered_parcels_are_mutable() {
    let mut parcel = Parcel::new(1, "Lenina 5", "t0");
    assert!(parcel.is_mutable());

    for status in [
        ParcelStatus::Sent,
        ParcelStatus::Delivered,
        ParcelStatus::from("lost"),
    ] {
        parcel.status = status;
        assert!(!parcel.is_mutable());
    }
}

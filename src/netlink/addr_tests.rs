//! Tests for address message decoding.

use super::*;
use crate::netlink::test_fixtures::{self, FAMILY_V4, FAMILY_V6, payload, record};
use crate::netlink::{IFA_LOCAL, parse_messages};

/// An attribute type this decoder does not interpret (`IFA_CACHEINFO`).
const IFA_CACHEINFO: u16 = 6;

/// Another uninterpreted type (`IFA_LABEL`).
const IFA_LABEL: u16 = 3;

mod address_record {
    use super::*;

    #[test]
    fn parse_reads_fields_and_native_index() {
        let mut bytes = vec![FAMILY_V6, 64, 0x80, 253];
        bytes.extend_from_slice(&42u32.to_ne_bytes());

        let parsed = AddressRecord::parse(&bytes).unwrap();

        assert_eq!(parsed.family, FAMILY_V6);
        assert_eq!(parsed.prefix_len, 64);
        assert_eq!(parsed.flags, 0x80);
        assert_eq!(parsed.scope, 253);
        assert_eq!(parsed.index, 42);
    }

    #[test]
    fn to_bytes_round_trips() {
        let original = record(FAMILY_V4, 0x0102_0304);

        assert_eq!(AddressRecord::parse(&original.to_bytes()).unwrap(), original);
    }

    #[test]
    fn short_payload_is_malformed() {
        let result = AddressRecord::parse(&[2, 24, 0, 0, 3]);

        assert_eq!(result, Err(ParseError::new("address record", 8, 5)));
    }
}

mod classification {
    use super::*;

    #[test]
    fn new_address_decodes_to_added() {
        let event = decode(&test_fixtures::new_address(3, &[10, 0, 0, 5])).unwrap();

        assert_eq!(event.kind(), ChangeKind::Added);
    }

    #[test]
    fn del_address_decodes_to_removed() {
        let event = decode(&test_fixtures::del_address(3, &[10, 0, 0, 5])).unwrap();

        assert_eq!(event.kind(), ChangeKind::Removed);
    }

    #[test]
    fn other_types_are_rejected() {
        for kind in [16u16, 17, 22, 24, 0, u16::MAX] {
            let mut message = test_fixtures::new_address(3, &[10, 0, 0, 5]);
            message.header.kind = kind;

            assert_eq!(
                decode(&message),
                Err(DecodeError::UnexpectedMessageType(kind))
            );
        }
    }

    #[test]
    fn unexpected_type_wins_over_malformed_payload() {
        let message = RawMessage::new(16, vec![0; 3]);

        assert_eq!(
            decode(&message),
            Err(DecodeError::UnexpectedMessageType(16))
        );
    }
}

mod attributes {
    use super::*;

    #[test]
    fn decodes_ipv4_example() {
        let message = RawMessage::new(
            RTM_NEWADDR,
            payload(record(FAMILY_V4, 3), &[(IFA_ADDRESS, &[10, 0, 0, 5])]),
        );

        let event = decode(&message).unwrap();

        assert_eq!(event, AddressEvent::added([10, 0, 0, 5], 3));
        assert_eq!(event.ip(), Some("10.0.0.5".parse().unwrap()));
    }

    #[test]
    fn decodes_ipv6_address() {
        let addr: std::net::Ipv6Addr = "2001:db8::1".parse().unwrap();
        let message = test_fixtures::del_address(9, &addr.octets());

        let event = decode(&message).unwrap();

        assert_eq!(event, AddressEvent::removed(addr.octets(), 9));
    }

    #[test]
    fn finds_address_after_unknown_attributes() {
        let message = RawMessage::new(
            RTM_NEWADDR,
            payload(
                record(FAMILY_V4, 5),
                &[
                    (IFA_LABEL, b"eth0\0"),
                    (IFA_CACHEINFO, &[0; 16]),
                    (IFA_LOCAL, &[192, 168, 0, 1]),
                    (IFA_ADDRESS, &[192, 168, 0, 2]),
                ],
            ),
        );

        let event = decode(&message).unwrap();

        assert_eq!(event.address_bytes(), &[192, 168, 0, 2]);
    }

    #[test]
    fn finds_address_before_unknown_attributes() {
        let message = RawMessage::new(
            RTM_NEWADDR,
            payload(
                record(FAMILY_V4, 5),
                &[(IFA_ADDRESS, &[172, 16, 0, 1]), (IFA_LABEL, b"wlan0\0")],
            ),
        );

        let event = decode(&message).unwrap();

        assert_eq!(event.address_bytes(), &[172, 16, 0, 1]);
    }

    #[test]
    fn skips_zero_length_and_odd_length_attributes() {
        let message = RawMessage::new(
            RTM_NEWADDR,
            payload(
                record(FAMILY_V4, 5),
                &[
                    (IFA_CACHEINFO, &[]),
                    (IFA_LABEL, &[1, 2, 3]),
                    (IFA_LABEL, &[1]),
                    (IFA_ADDRESS, &[10, 1, 2, 3]),
                ],
            ),
        );

        let event = decode(&message).unwrap();

        assert_eq!(event.address_bytes(), &[10, 1, 2, 3]);
    }

    #[test]
    fn last_address_attribute_wins() {
        let message = RawMessage::new(
            RTM_NEWADDR,
            payload(
                record(FAMILY_V4, 5),
                &[(IFA_ADDRESS, &[10, 0, 0, 1]), (IFA_ADDRESS, &[10, 0, 0, 2])],
            ),
        );

        let event = decode(&message).unwrap();

        assert_eq!(event.address_bytes(), &[10, 0, 0, 2]);
    }

    #[test]
    fn missing_address_yields_empty_address() {
        let message = RawMessage::new(
            RTM_DELADDR,
            payload(record(FAMILY_V4, 8), &[(IFA_LABEL, b"eth1\0")]),
        );

        let event = decode(&message).unwrap();

        assert!(!event.has_address());
        assert_eq!(event.interface_index(), 8);
        assert!(event.is_removed());
    }

    #[test]
    fn record_only_payload_is_valid() {
        let message = RawMessage::new(RTM_NEWADDR, record(FAMILY_V4, 1).to_bytes().to_vec());

        let event = decode(&message).unwrap();

        assert_eq!(event, AddressEvent::added(Vec::new(), 1));
    }
}

mod truncation {
    use super::*;

    /// Record (8) + label attribute (8) + address attribute (8).
    fn full_payload() -> Vec<u8> {
        payload(
            record(FAMILY_V4, 3),
            &[(IFA_LABEL, b"lo0\0"), (IFA_ADDRESS, &[10, 0, 0, 5])],
        )
    }

    #[test]
    fn every_cut_off_a_boundary_is_malformed() {
        let full = full_payload();
        assert_eq!(full.len(), 24);
        let boundaries = [8, 16, 24];

        for cut in 0..=full.len() {
            let message = RawMessage::new(RTM_NEWADDR, full[..cut].to_vec());
            let result = decode(&message);

            if boundaries.contains(&cut) {
                assert!(result.is_ok(), "cut at {cut} should decode");
            } else {
                assert!(
                    matches!(result, Err(DecodeError::Malformed(_))),
                    "cut at {cut} should be malformed, got {result:?}"
                );
            }
        }
    }

    #[test]
    fn cut_before_address_loses_only_the_address() {
        let full = full_payload();
        let message = RawMessage::new(RTM_NEWADDR, full[..16].to_vec());

        let event = decode(&message).unwrap();

        assert!(!event.has_address());
    }

    #[test]
    fn attribute_length_past_payload_is_malformed() {
        let mut bytes = record(FAMILY_V4, 3).to_bytes().to_vec();
        bytes.extend_from_slice(&64u16.to_ne_bytes());
        bytes.extend_from_slice(&IFA_ADDRESS.to_ne_bytes());
        bytes.extend_from_slice(&[10, 0, 0, 5]);

        let result = decode(&RawMessage::new(RTM_NEWADDR, bytes));

        assert_eq!(
            result,
            Err(DecodeError::Malformed(ParseError::new("attribute", 64, 8)))
        );
    }
}

mod from_wire {
    use super::*;

    #[test]
    fn framed_batch_decodes_in_order() {
        let mut buf = Vec::new();
        test_fixtures::new_address(3, &[10, 0, 0, 5]).encode_into(&mut buf);
        test_fixtures::del_address(4, &[10, 0, 0, 6]).encode_into(&mut buf);

        let events: Vec<AddressEvent> = parse_messages(&buf)
            .unwrap()
            .iter()
            .map(|m| decode(m).unwrap())
            .collect();

        assert_eq!(
            events,
            vec![
                AddressEvent::added([10, 0, 0, 5], 3),
                AddressEvent::removed([10, 0, 0, 6], 4),
            ]
        );
    }
}

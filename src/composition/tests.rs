//! Unit tests for the composition data decoder.

use rstest::{fixture, rstest};

use super::*;

const HEADER: [u8; HEADER_LEN] = [
    0x00, // page
    0x01, 0x00, // CID
    0x02, 0x00, // PID
    0x01, 0x00, // VID
    0x0A, 0x00, // CRPL
    0x01, 0x00, // features: relay
];

#[allow(
    unused_braces,
    reason = "rustc false positive for single-line rstest fixtures"
)]
#[fixture]
fn header() -> Vec<u8> { HEADER.to_vec() }

#[rstest]
fn decodes_single_sig_model_element(mut header: Vec<u8>) {
    header.extend_from_slice(&[0x00, 0x00, 0x01, 0x00, 0x01, 0x10]);

    let data = decode(&header).expect("decode composition");

    assert_eq!(
        data,
        CompositionData {
            company_id: 1,
            product_id: 2,
            version_id: 1,
            crpl: 10,
            features: Features {
                relay: true,
                ..Features::default()
            },
            elements: vec![Element {
                location: 0,
                sig_models: vec![0x1001],
                vendor_models: vec![],
            }],
        }
    );
}

#[rstest]
fn joins_vendor_company_and_model(mut header: Vec<u8>) {
    header.extend_from_slice(&[
        0x01, 0x01, // location
        0x02, 0x01, // two SIG, one vendor
        0x00, 0x00, // config server
        0x02, 0x00, // health server
        0x59, 0x00, 0x34, 0x12, // company 0x0059, model 0x1234
    ]);
    header.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

    let data = decode(&header).expect("decode composition");

    assert_eq!(data.elements.len(), 2);
    let primary = data.element(0).expect("primary element");
    assert_eq!(primary.location, 0x0101);
    assert_eq!(primary.sig_models, vec![0x0000, 0x0002]);
    assert_eq!(primary.vendor_models, vec![0x0059_1234]);
    assert_eq!(
        primary.models().collect::<Vec<_>>(),
        vec![0x0000, 0x0002, 0x0059_1234]
    );
    assert_eq!(data.element(1), Some(&Element::default()));
}

#[rstest]
#[case::no_elements(&[], 0, 0)]
#[case::partial_element_header(&[0x00, 0x00, 0x01], 0, 3)]
#[case::missing_sig_model(&[0x00, 0x00, 0x02, 0x00, 0x01, 0x10], 0, 6)]
#[case::missing_vendor_model(&[0x00, 0x00, 0x00, 0x01, 0x59, 0x00], 0, 6)]
#[case::second_element_truncated(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00], 1, 2)]
fn trailing_bytes_are_discarded(
    mut header: Vec<u8>,
    #[case] tail: &[u8],
    #[case] elements: usize,
    #[case] remainder: usize,
) {
    header.extend_from_slice(tail);

    let (data, ignored) = decode_with_remainder(&header).expect("decode composition");

    assert_eq!(data.elements.len(), elements);
    assert_eq!(ignored, remainder);
}

#[rstest]
#[case::empty(0)]
#[case::page_only(1)]
#[case::missing_features(HEADER_LEN - 1)]
fn short_header_is_rejected(#[case] len: usize) {
    assert_eq!(
        decode(&HEADER[..len]),
        Err(CompositionError::Truncated {
            have: len,
            need: HEADER_LEN,
        })
    );
}

#[rstest]
#[case(0x0000, Features::default())]
#[case(0x000F, Features { relay: true, proxy: true, friend: true, low_power: true })]
#[case(0x0006, Features { relay: false, proxy: true, friend: true, low_power: false })]
fn features_follow_bit_positions(#[case] bits: u16, #[case] expected: Features) {
    assert_eq!(Features::from_bits(bits), expected);
    assert_eq!(expected.to_bits(), bits);
}

#[test]
fn reserved_feature_bits_are_ignored() {
    assert_eq!(Features::from_bits(0xFFF0), Features::default());
}

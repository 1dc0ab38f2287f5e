// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline-level round-trip and boundary-scenario tests, kept separate from
//! the per-crate unit tests the way the teacher workspace separates its own
//! `-check` style integration crates from in-tree `#[cfg(test)]` modules.

use bwac::{BwtVariant, ModelChoice, MtfVariant, Pipeline, PipelineConfig, Precision};
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// A small public-domain excerpt (Lewis Carroll, *Alice's Adventures in
/// Wonderland*, opening of chapter 1) standing in for the ~150 KB reference
/// corpus the full property suite would use; trimmed to keep this test suite
/// fast while still exercising realistic English-text statistics.
const ALICE_EXCERPT: &str = include_str!("fixtures/alice30_excerpt.txt");

fn round_trip(input: &[u8], config: &PipelineConfig) -> (Vec<u8>, bwac::PipelineReport) {
    let pipeline = Pipeline::new(*config);
    let (coded, encode_report) = pipeline.encode(input);
    let (decoded, _decode_report) = pipeline.decode(&coded, input.len(), &encode_report.sentinels);
    assert_eq!(decoded, input, "round trip failed");
    (coded, encode_report)
}

#[test]
fn single_byte_round_trips_with_order0_at_16_bit_precision() {
    let config = PipelineConfig {
        model: ModelChoice::Order0,
        precision: Precision::Bits16,
        ..PipelineConfig::reference()
    };
    round_trip(b"a", &config);
}

#[test]
fn abracadabra_round_trips_through_the_full_reference_pipeline() {
    // Bijective BWT + MTFRL + order-0 CDF, the reference configuration.
    let config = PipelineConfig { model: ModelChoice::Cdf { depth: 0 }, ..PipelineConfig::reference() };
    let input = b"abracadabra";
    let (coded, _) = round_trip(input, &config);
    assert!(
        coded.len() < input.len() * 8,
        "coded length {} should stay well under input length x 8 ({})",
        coded.len(),
        input.len() * 8
    );
}

#[test]
fn a_long_run_of_zero_bytes_codes_sublinearly_with_the_filtered_bit_model() {
    let config = PipelineConfig {
        bwt: BwtVariant::Bijective,
        mtf: MtfVariant::Plain,
        model: ModelChoice::FilteredBit,
        precision: Precision::Bits16,
        ..PipelineConfig::reference()
    };
    let input = vec![0u8; 4096];
    let (coded, _) = round_trip(&input, &config);
    assert!(coded.len() < 64, "expected a sublinear coded length, got {} bytes", coded.len());
}

#[test]
fn uniform_random_bytes_do_not_compress_away() {
    let mut rng = SmallRng::seed_from_u64(0xA11CE);
    let input: Vec<u8> = (0..1024).map(|_| rng.gen()).collect();

    let (coded, _) = round_trip(&input, &PipelineConfig::reference());
    let slack = 32;
    assert!(
        coded.len() + slack >= input.len(),
        "incompressible input should not shrink past a small constant: coded {} vs input {}",
        coded.len(),
        input.len()
    );
}

#[test]
fn the_alice_excerpt_round_trips_and_reports_exact_byte_counts() {
    let input = ALICE_EXCERPT.as_bytes();
    let (coded, report) = round_trip(input, &PipelineConfig::reference());
    assert_eq!(report.bytes_in, input.len());
    assert_eq!(report.bytes_out, coded.len());
}

#[test]
fn two_runs_over_the_alice_excerpt_produce_byte_identical_coded_streams() {
    let input = ALICE_EXCERPT.as_bytes();
    let pipeline = Pipeline::new(PipelineConfig::reference());
    let (first, _) = pipeline.encode(input);
    let (second, _) = pipeline.encode(input);
    assert_eq!(first, second, "encoding must be deterministic across repeated runs");
}

#[test]
fn toggling_verify_does_not_change_the_coded_output() {
    let input = ALICE_EXCERPT.as_bytes();
    let plain = PipelineConfig { verify: false, ..PipelineConfig::reference() };
    let verified = PipelineConfig { verify: true, ..PipelineConfig::reference() };

    let (coded_plain, report_plain) = round_trip(input, &plain);
    let (coded_verified, report_verified) = round_trip(input, &verified);

    assert_eq!(coded_plain, coded_verified);
    assert_eq!(report_plain.verified, None);
    assert_eq!(report_verified.verified, Some(true));
}

#[test]
fn every_bwt_mtf_model_precision_combination_round_trips_on_a_mixed_input() {
    let input = {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut buf: Vec<u8> = (0..600).map(|_| rng.gen()).collect();
        // Mix in repeated runs so bitwise and CDF models alike see some
        // structure worth exploiting, rather than pure noise throughout.
        for chunk in buf.chunks_mut(40) {
            let fill = chunk[0];
            for b in chunk.iter_mut().skip(1).take(10) {
                *b = fill;
            }
        }
        buf
    };

    let bwts = [BwtVariant::Bijective, BwtVariant::NonBijective];
    let mtfs = [MtfVariant::Plain, MtfVariant::RunLength];
    let models = [
        ModelChoice::Order0,
        ModelChoice::Order1,
        ModelChoice::SlidingWindow,
        ModelChoice::CountingBit,
        ModelChoice::PredictiveCountingBit,
        ModelChoice::FilteredBit,
        ModelChoice::PredictiveFilteredBit,
        ModelChoice::Cdf { depth: 1 },
        ModelChoice::Meta { depth: 1 },
    ];
    let precisions = [Precision::Bits16, Precision::Bits32];

    for &bwt in &bwts {
        for &mtf in &mtfs {
            for &model in &models {
                for &precision in &precisions {
                    let config = PipelineConfig {
                        bwt,
                        mtf,
                        model,
                        precision,
                        block_size: 128,
                        ..PipelineConfig::reference()
                    };
                    round_trip(&input, &config);
                }
            }
        }
    }
}

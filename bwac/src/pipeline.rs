// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wires a BWT variant, an MTF variant, and a probability model into a
//! running encode or decode pipeline, per §2.1/§4.5.1/§6.1.
//!
//! Each direction realises the stage-per-thread shape described in §4.5.1 in
//! the way that best fits a fundamentally block-oriented transform feeding a
//! fundamentally sequential one:
//!
//! - **Encode**: a BWT thread chunks the input into blocks, transforms each
//!   independently, and streams the concatenated output bytes to an MTF
//!   thread, which recodes them (carrying its permutation state across block
//!   boundaries, unlike the BWT) into symbols for the final stage — the
//!   model/arithmetic-coder loop — which runs on the calling thread.
//! - **Decode**: the model/arithmetic-coder loop and the MTF inverse run
//!   together on one background thread (the `DecodeSink` each symbol is
//!   reported to *is* the MTF inverse, which is what lets a variable number
//!   of coded symbols per decoded byte — run-length folding — work without a
//!   second, independently-paced stage needing to agree on a byte count up
//!   front); the BWT inverse, which needs exact block boundaries, then runs
//!   on the calling thread.

use std::sync::{Arc, Mutex};

use bwac_arith::{Decoder, Encoder, PackedSink, PackedSource};
use bwac_core::chunk::{channel_with, spawn_stage, ChunkWriter, ItemReceiver};
use bwac_core::Word;
use bwac_models::DecodeSink;
use bwac_mtf::{StreamingMtf, StreamingMtfRlDecoder, StreamingMtfRlEncoder};

use crate::config::{BwtVariant, MtfVariant, PipelineConfig, Precision};
use crate::model::make_model;
use crate::report::PipelineReport;

/// Encode `input` per `config`. The returned [`PipelineReport::sentinels`]
/// is non-empty only for [`BwtVariant::NonBijective`], and must be carried
/// alongside the returned bytes to [`decode`].
pub fn encode(input: &[u8], config: &PipelineConfig) -> (Vec<u8>, PipelineReport) {
    match config.precision {
        Precision::Bits16 => encode_with::<u16>(input, config),
        Precision::Bits32 => encode_with::<u32>(input, config),
    }
}

/// Decode a stream `encode` produced. `output_len` is the original
/// plaintext length (the decoder output is not self-delimiting, per §6);
/// `sentinels` is `encode`'s reported side data, and is ignored (may be
/// empty) for [`BwtVariant::Bijective`].
pub fn decode(
    coded: &[u8],
    output_len: usize,
    sentinels: &[usize],
    config: &PipelineConfig,
) -> (Vec<u8>, PipelineReport) {
    match config.precision {
        Precision::Bits16 => decode_with::<u16>(coded, output_len, sentinels, config),
        Precision::Bits32 => decode_with::<u32>(coded, output_len, sentinels, config),
    }
}

/// A reusable handle around one [`PipelineConfig`], wiring the stages
/// together and joining their threads on every call, per §4.5.1.
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Pipeline { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn encode(&self, input: &[u8]) -> (Vec<u8>, PipelineReport) {
        encode(input, &self.config)
    }

    pub fn decode(&self, coded: &[u8], output_len: usize, sentinels: &[usize]) -> (Vec<u8>, PipelineReport) {
        decode(coded, output_len, sentinels, &self.config)
    }
}

fn encode_with<W: Word>(input: &[u8], config: &PipelineConfig) -> (Vec<u8>, PipelineReport) {
    let block_size = config.block_size.max(1);
    let (bwt_tx, bwt_rx) = channel_with::<u8>(block_size, config.ring_depth);
    let (sym_tx, sym_rx) = channel_with::<usize>(config.chunk_size, config.ring_depth);

    let sentinels = Arc::new(Mutex::new(Vec::new()));

    let input_owned = input.to_vec();
    let bwt_variant = config.bwt;
    let bwt_sentinels = Arc::clone(&sentinels);
    let bwt_thread = spawn_stage("bwt-encode", move || {
        let mut writer = bwt_tx;
        for block in input_owned.chunks(block_size) {
            let transformed = match bwt_variant {
                BwtVariant::Bijective => bwac_bwt::forward(block),
                BwtVariant::NonBijective => {
                    let (bytes, primary) = bwac_bwt::sentinel_forward(block, block.len());
                    bwt_sentinels.lock().expect("sentinel mutex was never poisoned").extend(primary);
                    bytes
                }
            };
            for b in transformed {
                if !writer.push(b) {
                    return;
                }
            }
            writer.flush();
        }
        writer.flush();
    });

    let mtf_variant = config.mtf;
    let mtf_thread = spawn_stage("mtf-encode", move || {
        let mut writer = sym_tx;
        match mtf_variant {
            MtfVariant::Plain => {
                let mut mtf = StreamingMtf::new();
                while let Some(block) = bwt_rx.recv() {
                    for b in block {
                        if !writer.push(mtf.encode(b)) {
                            return;
                        }
                    }
                }
            }
            MtfVariant::RunLength => {
                let mut mtf = StreamingMtfRlEncoder::new();
                while let Some(block) = bwt_rx.recv() {
                    for b in block {
                        for sym in mtf.encode(b) {
                            if !writer.push(sym) {
                                return;
                            }
                        }
                    }
                }
                for sym in mtf.finish() {
                    if !writer.push(sym) {
                        return;
                    }
                }
            }
        }
        writer.flush();
    });

    let mut model = make_model::<W>(config.model, mtf_variant.alphabet(), config.verify);
    let mut encoder: Encoder<W, PackedSink> = Encoder::new(PackedSink::new());
    let mut staging = Vec::new();
    for symbol in ItemReceiver::new(sym_rx) {
        staging.clear();
        model.encode(symbol, &mut staging);
        for sym in staging.drain(..) {
            encoder.encode(sym);
        }
    }
    let (bytes, symbols_coded) = encoder.finish();

    bwt_thread.join().expect("bwt encode stage panicked");
    mtf_thread.join().expect("mtf encode stage panicked");

    let sentinels = Arc::try_unwrap(sentinels)
        .expect("encode stages have already joined, dropping the only other Arc reference")
        .into_inner()
        .expect("sentinel mutex was never poisoned");

    let report = PipelineReport {
        bytes_in: input.len(),
        bytes_out: bytes.len(),
        symbols_coded,
        sentinels,
        verified: config.verify.then_some(true),
    };
    (bytes, report)
}

/// Reports each decoded MTF-rank symbol to the plain move-to-front inverse
/// and pushes the recovered bytes downstream.
struct MtfDecodeSink<'a> {
    writer: &'a mut ChunkWriter<u8>,
    mtf: &'a mut StreamingMtf,
    produced: usize,
    target: usize,
}

impl<'a> DecodeSink for MtfDecodeSink<'a> {
    fn accept(&mut self, symbol: usize) -> bool {
        let byte = self.mtf.decode(symbol);
        self.writer.push(byte);
        self.produced += 1;
        self.produced >= self.target
    }
}

/// As [`MtfDecodeSink`], but for the run-length-folded variant, where a
/// single coded symbol may resolve to zero, one, or several bytes (a folded
/// zero-run flushes all at once when broken by a non-zero rank).
struct MtfRlDecodeSink<'a> {
    writer: &'a mut ChunkWriter<u8>,
    mtf: &'a mut StreamingMtfRlDecoder,
    produced: usize,
    target: usize,
}

impl<'a> DecodeSink for MtfRlDecodeSink<'a> {
    fn accept(&mut self, symbol: usize) -> bool {
        for byte in self.mtf.push(symbol) {
            self.writer.push(byte);
            self.produced += 1;
        }
        self.produced >= self.target
    }
}

fn decode_with<W: Word>(
    coded: &[u8],
    output_len: usize,
    sentinels: &[usize],
    config: &PipelineConfig,
) -> (Vec<u8>, PipelineReport) {
    let block_size = config.block_size.max(1);
    let mtf_variant = config.mtf;
    let model_choice = config.model;
    let verify = config.verify;
    let bwt_variant = config.bwt;

    let (front_tx, front_rx) = channel_with::<u8>(block_size, config.ring_depth);
    let coded_owned = coded.to_vec();

    let front_thread = spawn_stage("model-mtf-decode", move || {
        let mut model = make_model::<W>(model_choice, mtf_variant.alphabet(), verify);
        let mut decoder: Decoder<W, PackedSource<'_>> = Decoder::new(PackedSource::new(&coded_owned));
        let mut writer = front_tx;
        let mut steps = 0usize;

        match mtf_variant {
            MtfVariant::Plain => {
                let mut mtf = StreamingMtf::new();
                let mut sink = MtfDecodeSink { writer: &mut writer, mtf: &mut mtf, produced: 0, target: output_len };
                while sink.produced < output_len {
                    steps += 1;
                    if decoder.decode(&mut *model, &mut sink) {
                        break;
                    }
                }
            }
            MtfVariant::RunLength => {
                let mut mtf = StreamingMtfRlDecoder::new(output_len);
                {
                    let mut sink = MtfRlDecodeSink { writer: &mut writer, mtf: &mut mtf, produced: 0, target: output_len };
                    while sink.produced < output_len {
                        steps += 1;
                        if decoder.decode(&mut *model, &mut sink) {
                            break;
                        }
                    }
                }
                for byte in mtf.finish() {
                    writer.push(byte);
                }
            }
        }
        writer.flush();
        steps
    });

    let mut out = Vec::with_capacity(output_len);
    let mut sentinel_iter = sentinels.iter().copied();
    while let Some(block) = front_rx.recv() {
        let inverted = match bwt_variant {
            BwtVariant::Bijective => bwac_bwt::inverse(&block),
            BwtVariant::NonBijective => {
                let primary =
                    sentinel_iter.next().expect("encode reports exactly one sentinel per block");
                bwac_bwt::sentinel_inverse(&block, &[primary], block.len())
            }
        };
        out.extend(inverted);
    }

    let symbols_coded = front_thread.join().expect("model/mtf decode stage panicked");

    let report = PipelineReport {
        bytes_in: coded.len(),
        bytes_out: out.len(),
        symbols_coded,
        sentinels: sentinels.to_vec(),
        verified: verify.then_some(true),
    };
    (out, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BwtVariant, ModelChoice, MtfVariant, Precision};

    fn round_trip(input: &[u8], config: &PipelineConfig) {
        let (coded, encode_report) = encode(input, config);
        let (decoded, decode_report) = decode(&coded, input.len(), &encode_report.sentinels, config);
        assert_eq!(decoded, input, "round trip failed for config {config:?}");
        assert_eq!(encode_report.bytes_in, input.len());
        assert_eq!(decode_report.bytes_out, input.len());
    }

    #[test]
    fn reference_configuration_round_trips_a_short_string() {
        round_trip(b"abracadabra", &PipelineConfig::reference());
    }

    #[test]
    fn plain_mtf_and_order0_round_trip() {
        let config = PipelineConfig {
            bwt: BwtVariant::Bijective,
            mtf: MtfVariant::Plain,
            model: ModelChoice::Order0,
            precision: Precision::Bits16,
            block_size: 64,
            chunk_size: 16,
            ring_depth: 2,
            verify: false,
        };
        round_trip(b"the quick brown fox jumps over the lazy dog", &config);
    }

    #[test]
    fn non_bijective_bwt_round_trips_with_small_blocks() {
        let config = PipelineConfig {
            bwt: BwtVariant::NonBijective,
            mtf: MtfVariant::RunLength,
            model: ModelChoice::Cdf { depth: 1 },
            precision: Precision::Bits16,
            block_size: 8,
            chunk_size: 8,
            ring_depth: 2,
            verify: false,
        };
        let input: Vec<u8> = (0..200u32).map(|i| (i % 37) as u8).collect();
        round_trip(&input, &config);
    }

    #[test]
    fn empty_input_round_trips() {
        round_trip(b"", &PipelineConfig::reference());
    }

    #[test]
    fn a_long_run_of_repeats_codes_sublinearly_with_the_filtered_bit_model() {
        let config = PipelineConfig {
            bwt: BwtVariant::Bijective,
            mtf: MtfVariant::Plain,
            model: ModelChoice::FilteredBit,
            precision: Precision::Bits16,
            ..PipelineConfig::reference()
        };
        let input = vec![0u8; 4096];
        let (coded, _) = encode(&input, &config);
        assert!(coded.len() < 64, "expected a sublinear coded length, got {}", coded.len());
        round_trip(&input, &config);
    }

    #[test]
    fn toggling_verify_does_not_change_the_coded_output() {
        let input = b"verify must be observationally transparent to the coded stream";
        let mut plain = PipelineConfig::reference();
        plain.verify = false;
        let mut verified = PipelineConfig::reference();
        verified.verify = true;

        let (coded_plain, _) = encode(input, &plain);
        let (coded_verified, _) = encode(input, &verified);
        assert_eq!(coded_plain, coded_verified);
    }

    #[test]
    fn every_model_choice_round_trips() {
        let choices = [
            ModelChoice::Order0,
            ModelChoice::Order1,
            ModelChoice::SlidingWindow,
            ModelChoice::CountingBit,
            ModelChoice::PredictiveCountingBit,
            ModelChoice::FilteredBit,
            ModelChoice::PredictiveFilteredBit,
            ModelChoice::Cdf { depth: 0 },
            ModelChoice::Cdf { depth: 2 },
            ModelChoice::Meta { depth: 0 },
        ];
        let input = b"mississippi river run run run banana banana";
        for model in choices {
            let config = PipelineConfig { model, ..PipelineConfig::reference() };
            round_trip(input, &config);
        }
    }

    #[test]
    fn bits32_precision_round_trips() {
        let config = PipelineConfig { precision: Precision::Bits32, ..PipelineConfig::reference() };
        round_trip(b"thirty-two bits of headroom", &config);
    }
}

// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Builds a boxed [`bwac_models::Model`] from a [`crate::config::ModelChoice`].
//!
//! Kept as a separate construction step from the model types themselves, per
//! §9 ("keep the model factory (maker) as a separate construction step to
//! decouple alphabet size from model identity").

use bwac_core::Word;
use bwac_models::{
    CdfModel, CountingBitModel, FilteredBitModel, MetaCdfModel, Model, Order0Model, Order1Model,
    PredictiveCountingBitModel, PredictiveFilteredBitModel, SlidingWindowModel,
};

use crate::config::ModelChoice;

pub(crate) fn make_model<W: Word>(
    choice: ModelChoice,
    alphabet: usize,
    verify: bool,
) -> Box<dyn Model<W>> {
    match choice {
        ModelChoice::Order0 => Box::new(Order0Model::<W>::new(alphabet)),
        ModelChoice::Order1 => Box::new(Order1Model::<W>::new(alphabet)),
        ModelChoice::SlidingWindow => Box::new(SlidingWindowModel::<W>::new(alphabet)),
        ModelChoice::CountingBit => Box::new(CountingBitModel::<W>::new(alphabet)),
        ModelChoice::PredictiveCountingBit => Box::new(PredictiveCountingBitModel::<W>::new(alphabet)),
        ModelChoice::FilteredBit => Box::new(FilteredBitModel::<W>::new(alphabet)),
        ModelChoice::PredictiveFilteredBit => Box::new(PredictiveFilteredBitModel::<W>::new(alphabet)),
        ModelChoice::Cdf { depth } => {
            Box::new(CdfModel::<W>::new(alphabet, depth).with_verify(verify))
        }
        ModelChoice::Meta { depth } => Box::new(MetaCdfModel::<W>::new(alphabet, depth)),
    }
}

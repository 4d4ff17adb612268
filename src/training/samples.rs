//! Decision-point samples for outcome prediction.
//!
//! Every state vector a player recorded becomes one sample, labelled 1 if the
//! player did not finish last and 0 if it did. The export keeps both labels
//! equally represented and writes one comma-separated line per sample.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::core::{GameRng, PlayerId};
use crate::game::GameCore;

/// One labelled feature vector.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingSample {
    pub player: PlayerId,
    pub features: Vec<f32>,
    /// 1 if the player did not lose.
    pub label: u8,
}

impl TrainingSample {
    /// `f0,f1,...,fn,label`
    #[must_use]
    pub fn to_line(&self) -> String {
        let mut line: Vec<String> = self.features.iter().map(ToString::to_string).collect();
        line.push(self.label.to_string());
        line.join(",")
    }
}

/// Split every recorded vector into (losers, not losers).
pub fn labelled_samples(core: &GameCore) -> (Vec<TrainingSample>, Vec<TrainingSample>) {
    let last = core.player_count() as u8;
    let mut losers = Vec::new();
    let mut others = Vec::new();
    for player in core.players() {
        let lost = core.rank(player) == Some(last);
        let bucket = if lost { &mut losers } else { &mut others };
        bucket.extend(core.state_vectors(player).iter().map(|v| TrainingSample {
            player,
            features: v.clone(),
            label: u8::from(!lost),
        }));
    }
    (losers, others)
}

/// Equal numbers of both labels, shuffled.
///
/// The larger class is downsampled to the size of the smaller one.
pub fn balanced_samples(core: &GameCore, rng: &mut GameRng) -> Vec<TrainingSample> {
    let (mut losers, mut others) = labelled_samples(core);
    let keep = losers.len().min(others.len());
    rng.shuffle(&mut losers);
    rng.shuffle(&mut others);
    losers.truncate(keep);
    others.truncate(keep);

    let mut out = losers;
    out.append(&mut others);
    rng.shuffle(&mut out);
    out
}

/// Write one line per sample, no header.
pub fn write_lines<W: Write>(samples: &[TrainingSample], mut out: W) -> io::Result<()> {
    for sample in samples {
        writeln!(out, "{}", sample.to_line())?;
    }
    Ok(())
}

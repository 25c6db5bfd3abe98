use std::{fmt::Write as _, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Source of new piece kinds.
///
/// The session draws every piece through this trait, so tests and replays can
/// substitute a fixed sequence for the random generator.
pub trait PieceGenerator {
    /// Returns the kind of the next piece to enter the buffer.
    fn generate(&mut self) -> PieceKind;
}

/// Picks each piece uniformly at random from the seven kinds.
#[derive(Debug, Clone)]
pub struct UniformPieces<R = Pcg32> {
    rng: R,
}

impl Default for UniformPieces {
    fn default() -> Self {
        Self::new()
    }
}

impl UniformPieces {
    /// Creates a generator with a random seed.
    ///
    /// For deterministic piece generation, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic piece generation.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self::from_rng(Pcg32::from_seed(seed.0))
    }
}

impl<R> UniformPieces<R>
where
    R: Rng,
{
    /// Uses an existing random number generator.
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R> PieceGenerator for UniformPieces<R>
where
    R: Rng,
{
    fn generate(&mut self) -> PieceKind {
        self.rng.random()
    }
}

/// Replays a fixed list of piece kinds, starting over when it runs out.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceGenerator as _, PieceKind, ScriptedPieces};
///
/// let mut pieces = ScriptedPieces::new([PieceKind::O, PieceKind::I]);
/// assert_eq!(pieces.generate(), PieceKind::O);
/// assert_eq!(pieces.generate(), PieceKind::I);
/// assert_eq!(pieces.generate(), PieceKind::O);
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedPieces {
    pieces: Vec<PieceKind>,
    index: usize,
}

impl ScriptedPieces {
    /// # Panics
    ///
    /// Panics if `pieces` is empty.
    pub fn new<I>(pieces: I) -> Self
    where
        I: IntoIterator<Item = PieceKind>,
    {
        let pieces: Vec<_> = pieces.into_iter().collect();
        assert!(!pieces.is_empty(), "piece script must not be empty");
        Self { pieces, index: 0 }
    }
}

impl PieceGenerator for ScriptedPieces {
    fn generate(&mut self) -> PieceKind {
        let kind = self.pieces[self.index];
        self.index = (self.index + 1) % self.pieces.len();
        kind
    }
}

/// One-piece lookahead in front of a [`PieceGenerator`].
///
/// The buffer always holds exactly one pending piece, so the upcoming piece
/// can be shown before it spawns.
#[derive(Debug, Clone)]
pub struct NextPieceBuffer<G> {
    generator: G,
    next: PieceKind,
}

impl<G> NextPieceBuffer<G>
where
    G: PieceGenerator,
{
    /// Creates the buffer and fills it from the generator.
    pub fn new(mut generator: G) -> Self {
        let next = generator.generate();
        Self { generator, next }
    }

    /// Returns the pending piece without consuming it.
    #[must_use]
    pub fn peek(&self) -> PieceKind {
        self.next
    }

    /// Takes the pending piece and immediately refills the buffer.
    pub fn pop(&mut self) -> PieceKind {
        std::mem::replace(&mut self.next, self.generator.generate())
    }

    /// Discards the pending piece and draws a fresh one.
    pub fn redraw(&mut self) {
        self.next = self.generator.generate();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: expected 32 hexadecimal digits")]
pub struct SeedParseError {
    input: String,
}

/// Seed for deterministic piece generation.
///
/// This is a 128-bit (16-byte) seed used to initialize the random number
/// generator for piece generation. Using the same seed will produce the same
/// sequence of pieces, enabling:
///
/// - Reproducible gameplay for debugging
/// - Scripted headless runs
/// - Deterministic testing
///
/// Seeds are written as 32 hexadecimal digits.
///
/// # Example
///
/// ```
/// use blockfall_engine::{GameSession, PieceSeed, SessionConfig};
///
/// let seed: PieceSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
///
/// let mut session1 = GameSession::with_seed(SessionConfig::default(), seed).unwrap();
/// let mut session2 = GameSession::with_seed(SessionConfig::default(), seed).unwrap();
/// session1.start();
/// session2.start();
///
/// // Both sessions will have the same piece sequence
/// assert_eq!(session1.snapshot(), session2.snapshot());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl FromStr for PieceSeed {
    type Err = SeedParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || SeedParseError {
            input: s.to_owned(),
        };
        if s.len() != 32 {
            return Err(error());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| error())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
///
/// This implementation enables idiomatic seed generation with `rng.random()`.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_always_holds_one_piece() {
        let mut buffer = NextPieceBuffer::new(ScriptedPieces::new([
            PieceKind::T,
            PieceKind::S,
            PieceKind::Z,
        ]));
        assert_eq!(buffer.peek(), PieceKind::T);
        assert_eq!(buffer.pop(), PieceKind::T);
        assert_eq!(buffer.peek(), PieceKind::S);
        buffer.redraw();
        assert_eq!(buffer.peek(), PieceKind::Z);
        assert_eq!(buffer.pop(), PieceKind::Z);
        assert_eq!(buffer.peek(), PieceKind::T);
    }

    #[test]
    #[should_panic(expected = "piece script must not be empty")]
    fn test_empty_script_panics() {
        let _ = ScriptedPieces::new([]);
    }

    #[test]
    fn test_uniform_pieces_use_every_kind() {
        let mut pieces = UniformPieces::with_seed(PieceSeed([0x5A; 16]));
        let mut seen = [0_usize; PieceKind::LEN];
        for _ in 0..700 {
            seen[pieces.generate() as usize - 1] += 1;
        }
        assert!(seen.iter().all(|&count| count > 0), "{seen:?}");
    }

    mod piece_seed_serialization {
        use super::*;

        #[test]
        fn test_roundtrip_random_seed() {
            let seed: PieceSeed = rand::rng().random();
            let serialized = serde_json::to_string(&seed).unwrap();
            let deserialized: PieceSeed = serde_json::from_str(&serialized).unwrap();
            assert_eq!(seed, deserialized);
        }

        #[test]
        fn test_known_value_all_zeros() {
            let seed = PieceSeed([0u8; 16]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"00000000000000000000000000000000\"");
        }

        #[test]
        fn test_known_value_sequential_bytes() {
            // Big-endian: first byte appears first in the hex string
            let seed = PieceSeed([
                0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF, 0xFE, 0xDC, 0xBA, 0x98, 0x76, 0x54,
                0x32, 0x10,
            ]);
            let serialized = serde_json::to_string(&seed).unwrap();
            assert_eq!(serialized, "\"0123456789abcdeffedcba9876543210\"");

            let parsed: PieceSeed = "0123456789ABCDEFFEDCBA9876543210".parse().unwrap();
            assert_eq!(parsed, seed);
        }

        #[test]
        fn test_parse_errors() {
            // 32 chars but not hex
            assert!("ghijklmnopqrstuvwxyzghijklmnopqr".parse::<PieceSeed>().is_err());
            assert!("0123456789abcdef0123456789abcde".parse::<PieceSeed>().is_err());
            assert!("0123456789abcdef0123456789abcdef0".parse::<PieceSeed>().is_err());
            assert!("".parse::<PieceSeed>().is_err());

            let err = serde_json::from_str::<PieceSeed>("\"xyz\"").unwrap_err();
            assert!(err.to_string().contains("invalid hex"));
        }

        #[test]
        fn test_deterministic_piece_generation() {
            let seed = PieceSeed([
                0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66,
                0x77, 0x88,
            ]);

            let mut pieces1 = UniformPieces::with_seed(seed);
            let mut pieces2 = UniformPieces::with_seed(seed);

            for _ in 0..20 {
                assert_eq!(pieces1.generate(), pieces2.generate());
            }
        }
    }
}

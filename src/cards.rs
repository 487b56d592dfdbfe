use std::sync::LazyLock;

/// Number of questions asked, one per binary digit.
pub const BITS: usize = 6;

/// Largest number the player may pick (`2^BITS - 1`).
pub const MAX_NUMBER: u8 = (1 << BITS) - 1;

static CARDS: LazyLock<CardSet> = LazyLock::new(generate_cards);

/// One question card: every number in `1..=MAX_NUMBER` with `bit` set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    bit: usize,
    numbers: Vec<u8>,
}

impl Card {
    fn for_bit(bit: usize) -> Self {
        let numbers = (1..=MAX_NUMBER).filter(|&n| (n >> bit) & 1 == 1).collect();
        Self { bit, numbers }
    }

    #[must_use]
    pub fn bit(&self) -> usize {
        self.bit
    }

    /// Value contributed to the result when the player answers "yes".
    #[must_use]
    pub fn value(&self) -> u8 {
        1 << self.bit
    }

    #[must_use]
    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    #[must_use]
    pub fn contains(&self, n: u8) -> bool {
        self.numbers.binary_search(&n).is_ok()
    }
}

/// The six question cards, least-significant bit first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSet {
    cards: [Card; BITS],
}

impl CardSet {
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Answers an honest player gives for `n`: its binary digits.
    #[must_use]
    pub fn membership(&self, n: u8) -> [bool; BITS] {
        std::array::from_fn(|i| self.cards[i].contains(n))
    }
}

/// Builds the card set from scratch. Deterministic; prefer [`cards`] outside tests.
#[must_use]
pub fn generate_cards() -> CardSet {
    CardSet {
        cards: std::array::from_fn(Card::for_bit),
    }
}

/// Process-wide card set, computed on first use.
#[must_use]
pub fn cards() -> &'static CardSet {
    &CARDS
}

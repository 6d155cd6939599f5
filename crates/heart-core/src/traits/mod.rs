mod timex_normalizer;

pub use timex_normalizer::ITimexNormalizer;

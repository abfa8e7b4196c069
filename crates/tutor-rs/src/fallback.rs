//! Canned replies used when the completion API is unavailable.
//!
//! Explain and simplify pick a paragraph at random. Quiz mode fakes a
//! multi-turn quiz from the current message alone: restart and stop phrases,
//! a bare letter answer, or anything else. It keeps no memory of earlier
//! turns, so it cannot tell right answers from wrong ones and always moves on
//! to the same second question.

use std::sync::LazyLock;

use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;

use crate::mode::Mode;

/// Sent when the student stops the quiz.
pub const QUIZ_ENDED: &str = "Quiz ended. Thanks for practicing! Type 'new quiz' to start again.";

/// Sent after any bare A-D answer, whichever question was shown.
pub const QUIZ_SECOND_QUESTION: &str = "Correct! Plants take in Carbon Dioxide to perform photosynthesis.\n\nNext Question:\nWhere does the light-dependent reaction take place?\n\nA) Stroma\nB) Thylakoid membranes\nC) Roots\nD) Stem";

/// Openers for a fresh quiz.
pub const QUIZ_OPENERS: [&str; 3] = [
    "Question 1: What gas do plants take in from the atmosphere during photosynthesis?\n\nA) Oxygen\nB) Carbon Dioxide\nC) Nitrogen\nD) Hydrogen",
    "Question 1: Where does the light-dependent reaction take place?\n\nA) Stroma\nB) Thylakoid membranes\nC) Roots\nD) Stem",
    "Question 1: What is the primary product of photosynthesis?\n\nA) Glucose\nB) Water\nC) Carbon Dioxide\nD) Nitrogen",
];

pub const EXPLAIN_REPLIES: [&str; 3] = [
    "Photosynthesis is the process by which green plants create their own food using sunlight. \n\nThink of it like a solar-powered kitchen inside the leaf:\n1. **Ingredients**: Water (from roots) + Carbon Dioxide (from air)\n2. **Energy**: Sunlight (captured by chlorophyll)\n3. **Product**: Glucose (sugar for food) + Oxygen (released into air)\n\nThe chemical equation is: 6CO₂ + 6H₂O + Light → C₆H₁₂O₆ + 6O₂",
    "The two main stages are:\n\n1. **Light-Dependent Reactions**: These happen in the thylakoid membranes. They capture sunlight and split water molecules to make energy (ATP/NADPH).\n\n2. **Calvin Cycle**: This happens in the stroma. It uses that energy to turn CO₂ into sugar (glucose).",
    "This process is vital because it produces the oxygen we breathe and forms the base of the food chain for almost all life on Earth.",
];

pub const SIMPLIFY_REPLIES: [&str; 3] = [
    "Imagine a plant is like a chef. \n\nIt needs three things to cook:\n1. Sunlight (the fire)\n2. Water (from the rain)\n3. Air (specifically CO₂)\n\nIt mixes them all up in its green leaves and makes sugar! That sugar is its food to help it grow.",
    "Plants breathe in the bad air (CO₂) and breathe out the good air (Oxygen) that we need to live. They are like nature's air purifiers!",
    "Green stuff in leaves called 'chlorophyll' is what catches the sunlight. It's like a solar panel for the plant.",
];

const RESTART_PHRASES: [&str; 3] = ["NEW QUIZ", "RESTART", "START OVER"];
const STOP_PHRASES: [&str; 3] = ["END QUIZ", "STOP", "QUIT"];

static SINGLE_LETTER_ANSWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-D]$").expect("static regex"));

/// How a quiz-mode message was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizIntent {
    Restart,
    Stop,
    Answer,
    Start,
}

/// Classify a quiz message by its text alone. Restart wins over stop, stop
/// wins over a letter answer.
pub fn classify_quiz_message(message: &str) -> QuizIntent {
    let normalized = message.trim().to_uppercase();
    if RESTART_PHRASES.iter().any(|p| normalized.contains(p)) {
        QuizIntent::Restart
    } else if STOP_PHRASES.iter().any(|p| normalized.contains(p)) {
        QuizIntent::Stop
    } else if SINGLE_LETTER_ANSWER.is_match(&normalized) {
        QuizIntent::Answer
    } else {
        QuizIntent::Start
    }
}

/// Produces demo replies. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackResponder;

impl FallbackResponder {
    pub fn new() -> Self {
        Self
    }

    /// Pick a reply using the thread-local RNG.
    pub fn respond(&self, mode: Mode, message: &str) -> String {
        self.respond_with(mode, message, &mut rand::thread_rng())
    }

    /// Pick a reply using the given RNG.
    pub fn respond_with<R: Rng + ?Sized>(&self, mode: Mode, message: &str, rng: &mut R) -> String {
        let reply = match mode {
            Mode::Quiz => match classify_quiz_message(message) {
                QuizIntent::Stop => QUIZ_ENDED,
                QuizIntent::Answer => QUIZ_SECOND_QUESTION,
                QuizIntent::Restart | QuizIntent::Start => pick(&QUIZ_OPENERS, rng),
            },
            Mode::Explain => pick(&EXPLAIN_REPLIES, rng),
            Mode::Simplify => pick(&SIMPLIFY_REPLIES, rng),
        };
        reply.to_string()
    }
}

fn pick<R: Rng + ?Sized>(pool: &[&'static str], rng: &mut R) -> &'static str {
    // Pools are non-empty constants.
    pool.choose(rng).copied().unwrap_or(pool[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn restart_phrases_any_case_yield_opener() {
        let responder = FallbackResponder::new();
        let mut rng = rng();
        for msg in ["new quiz", "NEW QUIZ", "  New Quiz please ", "restart", "let's start over"] {
            for _ in 0..10 {
                let reply = responder.respond_with(Mode::Quiz, msg, &mut rng);
                assert!(QUIZ_OPENERS.contains(&reply.as_str()), "{msg}: {reply}");
            }
        }
    }

    #[test]
    fn restart_takes_precedence_over_stop() {
        assert_eq!(classify_quiz_message("stop and restart"), QuizIntent::Restart);
    }

    #[test]
    fn stop_phrases_yield_closing_sentence() {
        let responder = FallbackResponder::new();
        let mut rng = rng();
        for msg in ["stop", "STOP", "end quiz", "I quit"] {
            assert_eq!(responder.respond_with(Mode::Quiz, msg, &mut rng), QUIZ_ENDED);
        }
    }

    #[test]
    fn bare_letter_yields_fixed_second_question() {
        let responder = FallbackResponder::new();
        let mut rng = rng();
        for msg in ["A", "b", " C ", "d"] {
            assert_eq!(
                responder.respond_with(Mode::Quiz, msg, &mut rng),
                QUIZ_SECOND_QUESTION
            );
        }
    }

    #[test]
    fn other_quiz_messages_yield_opener() {
        let responder = FallbackResponder::new();
        let mut rng = rng();
        for msg in ["", "Start a quiz", "E", "AB", "A)"] {
            let reply = responder.respond_with(Mode::Quiz, msg, &mut rng);
            assert!(QUIZ_OPENERS.contains(&reply.as_str()), "{msg:?}: {reply}");
        }
    }

    #[test]
    fn explain_and_simplify_draw_from_their_pools() {
        let responder = FallbackResponder::new();
        let mut rng = rng();
        for _ in 0..20 {
            let explain = responder.respond_with(Mode::Explain, "stop", &mut rng);
            assert!(EXPLAIN_REPLIES.contains(&explain.as_str()));
            let simplify = responder.respond_with(Mode::Simplify, "A", &mut rng);
            assert!(SIMPLIFY_REPLIES.contains(&simplify.as_str()));
        }
    }

    #[test]
    fn same_seed_same_choice() {
        let responder = FallbackResponder::new();
        let a = responder.respond_with(Mode::Explain, "hi", &mut StdRng::seed_from_u64(42));
        let b = responder.respond_with(Mode::Explain, "hi", &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn every_opener_is_reachable() {
        let responder = FallbackResponder::new();
        let mut rng = rng();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(responder.respond_with(Mode::Quiz, "hello", &mut rng));
        }
        assert_eq!(seen.len(), QUIZ_OPENERS.len());
    }
}

//! Built-in study notes the tutor is allowed to draw from.

/// A named topic with a block of reference text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnowledgeDocument {
    pub topic: &'static str,
    pub notes: &'static str,
}

/// The study notes every prompt is grounded in.
pub const PHOTOSYNTHESIS: KnowledgeDocument = KnowledgeDocument {
    topic: "Photosynthesis",
    notes: PHOTOSYNTHESIS_NOTES,
};

const PHOTOSYNTHESIS_NOTES: &str = "
Topic: Photosynthesis

Definition:
Photosynthesis is the process by which green plants use sunlight to synthesize nutrients from carbon dioxide and water. It primarily occurs in the chloroplasts of plant cells.

Key Points:
- Photosynthesis converts light energy into chemical energy stored in glucose
- The process requires chlorophyll (green pigment), sunlight, carbon dioxide, and water
- Oxygen is released as a byproduct
- Takes place mainly in leaves

The Chemical Equation:
6CO₂ + 6H₂O + Light Energy → C₆H₁₂O₆ + 6O₂

Two Main Stages:
1. Light-dependent reactions (occur in thylakoid membranes)
   - Capture light energy
   - Split water molecules
   - Produce ATP and NADPH

2. Light-independent reactions / Calvin Cycle (occur in stroma)
   - Use ATP and NADPH from light reactions
   - Fix carbon dioxide into glucose
   - Can occur in light or dark

Importance:
- Produces oxygen for the atmosphere
- Forms the base of most food chains
- Removes CO₂ from the atmosphere
- Provides energy for the plant and organisms that eat plants
";

/// The document used when the caller does not pick one.
pub fn default_document() -> &'static KnowledgeDocument {
    &PHOTOSYNTHESIS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_document_is_photosynthesis() {
        let doc = default_document();
        assert_eq!(doc.topic, "Photosynthesis");
        assert!(doc.notes.contains("Calvin Cycle"));
        assert!(doc.notes.contains("thylakoid membranes"));
    }
}

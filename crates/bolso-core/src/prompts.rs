//! Embedded behavioral prompt
//!
//! The persona prompt is the de-facto protocol contract: it instructs the
//! model to end processed expenses with the fenced json block that
//! [`crate::extract`] looks for. It is compiled into the binary; there is
//! no override layer because changing it would break extraction.

/// The fixed PT-BR system instruction sent with every turn
pub const SYSTEM_INSTRUCTION: &str = include_str!("../../../prompts/system.md");

/// Fixed greeting seeded into a fresh conversation log
pub const GREETING: &str =
    "Ih, lá vem o gastador. Qual o boleto da vez ou em que futilidade você jogou seu dinheiro no lixo agora?";

/// Greeting used after the user wipes everything
pub const RESET_GREETING: &str = "Histórico limpo. Mas sua conta bancária continua no CTI.";

/// Fallback reply when the gateway call fails
pub const FALLBACK_REPLY: &str = "Meu servidor de deboche caiu. Tenta de novo, seu pão-duro.";

/// Prefix for the spoken rendition of a reply
pub const SPEECH_PREFIX: &str = "Diga com deboche extremo: ";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_instruction_carries_the_block_convention() {
        assert!(SYSTEM_INSTRUCTION.contains("```json"));
        assert!(SYSTEM_INSTRUCTION.contains("amount"));
        assert!(SYSTEM_INSTRUCTION.contains("category"));
    }
}

//! Conversational command implementations (chat, send)

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use bolso_core::{decode_pcm16, ChatSession, GatewayClient, LedgerStore, TurnOutcome};

/// Sample rate of Gemini TTS PCM payloads
const TTS_SAMPLE_RATE: u32 = 24_000;

/// Run an interactive chat session on stdin/stdout
pub async fn cmd_chat(gateway: GatewayClient, store: LedgerStore, mute: bool) -> Result<()> {
    let mut session = ChatSession::new(gateway, store);
    session.set_muted(mute);

    println!();
    println!("💬 Bolso — digite sua mensagem ou /sair para encerrar");
    println!("   Comandos: /sair  /limpar  /mudo  /gastos");
    println!();
    print_reply(&session.messages()[0].content);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("você> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            "/sair" => break,
            "/limpar" => {
                session.clear_history()?;
                print_reply(&session.messages()[0].content);
            }
            "/mudo" => {
                let muted = !session.is_muted();
                session.set_muted(muted);
                println!("   🔇 Fala {}", if muted { "desligada" } else { "ligada" });
            }
            "/gastos" => {
                for expense in session.expenses() {
                    println!(
                        "   {} — {} ({})",
                        super::format_brl(expense.amount),
                        expense.description,
                        expense.category
                    );
                }
                if session.expenses().is_empty() {
                    println!("   (nenhum gasto registrado)");
                }
            }
            text => {
                let outcome = session.send_text(text).await?;
                print_outcome(&outcome);
            }
        }
    }

    println!();
    Ok(())
}

/// Send a single turn (text and/or media files) and print the outcome
pub async fn cmd_send(
    gateway: GatewayClient,
    store: LedgerStore,
    text: &str,
    image: Option<&Path>,
    audio: Option<&Path>,
    mute: bool,
) -> Result<()> {
    let mut session = ChatSession::new(gateway, store);
    session.set_muted(mute);

    let outcome = if let Some(path) = image {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read image file {}", path.display()))?;
        session.send_image(&bytes).await?
    } else if let Some(path) = audio {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read audio file {}", path.display()))?;
        session.send_audio(&bytes).await?
    } else {
        session.send_text(text).await?
    };

    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &TurnOutcome) {
    print_reply(&outcome.reply);

    if let Some(expense) = &outcome.expense {
        println!(
            "   💸 Gasto registrado: {} — {} ({})",
            super::format_brl(expense.amount),
            expense.description,
            expense.category
        );
    }

    if let Some(payload) = &outcome.speech {
        match decode_pcm16(payload, TTS_SAMPLE_RATE, 1) {
            Ok(buffer) => println!("   🔊 Resposta falada: {:.1}s", buffer.duration_secs()),
            Err(e) => println!("   🔊 Resposta falada recebida, mas inválida: {}", e),
        }
    }
}

fn print_reply(reply: &str) {
    // Show only the spoken part; the json payload is bookkeeping
    let visible = reply.split("```json").next().unwrap_or(reply).trim();
    if !visible.is_empty() {
        println!("bolso> {}", visible);
    }
}

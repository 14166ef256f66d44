//! `azcc "<prompt>"` — one-shot request.

use azcc_agent::{ResponseMode, Session};

pub async fn run(session: &mut Session, prompt: &str, continue_conversation: bool, mode: ResponseMode) {
    let Some(reply) = super::ask_and_print(session, prompt, continue_conversation, mode).await else {
        return;
    };

    // Only continued conversations are recorded from the one-shot path
    if continue_conversation {
        session.record_exchange(prompt, reply);
        if let Err(e) = session.save_history() {
            eprintln!("Warning: {e}");
        }
    }
}

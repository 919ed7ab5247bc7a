use crate::error::invalid_input;
use crate::sink::{HttpLeadSink, LeadSink, StoreLeadSink};
use anyhow::Result;
use clap::Args;
use leadline_config::{AppConfig, MAX_TYPING_DELAY_MS};
use leadline_core::chat::{
    ChatState, Conversation, CountryChoice, Effect, Event, Step, WidgetParams,
};
use leadline_store::Store;
use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};
use std::thread;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// Lead source; also selects the brand.
    #[arg(long, conflicts_with = "query")]
    pub source: Option<String>,
    /// es or en.
    #[arg(long, conflicts_with = "query")]
    pub lang: Option<String>,
    /// Theme color as 3 or 6 hex digits.
    #[arg(long, conflicts_with = "query")]
    pub primary: Option<String>,
    /// Widget query string, e.g. `source=colbrew&lang=en`.
    #[arg(long)]
    pub query: Option<String>,
    /// Store the lead directly instead of posting to the endpoint.
    #[arg(long)]
    pub local: bool,
    /// Overrides `widget.endpoint` from the config.
    #[arg(long, conflicts_with = "local")]
    pub endpoint: Option<String>,
    /// Overrides `widget.typing_delay_ms` from the config.
    #[arg(long)]
    pub typing_delay_ms: Option<u64>,
}

/// Runs one conversation on stdin/stdout. `store` is set for `--local`.
pub fn chat(config: &AppConfig, store: Option<&Store>, args: ChatArgs) -> Result<()> {
    let params = match args.query.as_deref() {
        Some(query) => WidgetParams::from_query(query),
        None => WidgetParams::new(
            args.source.as_deref(),
            args.lang.as_deref(),
            args.primary.as_deref(),
        ),
    };
    let delay_ms = args.typing_delay_ms.unwrap_or(config.widget.typing_delay_ms);
    if delay_ms > MAX_TYPING_DELAY_MS {
        return Err(invalid_input(format!(
            "typing delay must be at most {MAX_TYPING_DELAY_MS} ms"
        )));
    }
    let conversation = Conversation::new(&config.catalog(), &params)
        .with_whatsapp_number(config.widget.whatsapp_number.as_str());

    let http;
    let local;
    let sink: &dyn LeadSink = match store {
        Some(store) => {
            local = StoreLeadSink::new(store);
            &local
        }
        None => {
            let endpoint = args.endpoint.as_deref().unwrap_or(config.widget.endpoint.as_str());
            http = HttpLeadSink::new(endpoint, &config.server.api_key)?;
            &http
        }
    };
    debug!(
        source = conversation.source(),
        brand = %conversation.brand().key,
        lang = %conversation.lang(),
        sink = sink.sink_name(),
        "starting chat"
    );

    let stdout = io::stdout();
    let accent = if stdout.is_terminal() {
        params.theme.primary_rgb()
    } else {
        None
    };
    let state = ChatDriver::new(
        &conversation,
        sink,
        io::stdin().lock(),
        stdout.lock(),
        Duration::from_millis(delay_ms),
    )
    .with_accent(accent)
    .run()?;
    debug!(step = ?state.step, "chat finished");
    Ok(())
}

/// Terminal front end for one conversation.
pub struct ChatDriver<'a, R, W> {
    conversation: &'a Conversation,
    sink: &'a dyn LeadSink,
    input: R,
    output: W,
    typing_delay: Duration,
    accent: Option<(u8, u8, u8)>,
    countries: Vec<CountryChoice>,
    interests: Vec<String>,
}

impl<'a, R: BufRead, W: Write> ChatDriver<'a, R, W> {
    pub fn new(
        conversation: &'a Conversation,
        sink: &'a dyn LeadSink,
        input: R,
        output: W,
        typing_delay: Duration,
    ) -> Self {
        Self {
            conversation,
            sink,
            input,
            output,
            typing_delay,
            accent: None,
            countries: Vec::new(),
            interests: Vec::new(),
        }
    }

    /// Colors the assistant name with the widget's primary color.
    pub fn with_accent(mut self, accent: Option<(u8, u8, u8)>) -> Self {
        self.accent = accent;
        self
    }

    /// Runs until the conversation ends or input is exhausted.
    pub fn run(mut self) -> Result<ChatState> {
        let mut state = ChatState::default();
        let mut pending = VecDeque::from([Event::Start]);

        loop {
            while let Some(event) = pending.pop_front() {
                let (next, effects) = self.conversation.apply(state, event);
                state = next;
                for effect in effects {
                    if let Some(event) = self.perform(effect)? {
                        pending.push_back(event);
                    }
                }
            }
            if state.step.is_terminal() {
                return Ok(state);
            }

            write!(self.output, "> ")?;
            self.output.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(state);
            }
            match self.read_event(state.step, line.trim()) {
                Some(event) => pending.push_back(event),
                None => self.hint(state.step)?,
            }
        }
    }

    fn perform(&mut self, effect: Effect) -> Result<Option<Event>> {
        match effect {
            Effect::Say(text) => {
                if !self.typing_delay.is_zero() {
                    thread::sleep(self.typing_delay);
                }
                let name = &self.conversation.brand().name;
                match self.accent {
                    Some((r, g, b)) => {
                        writeln!(self.output, "\x1b[1;38;2;{r};{g};{b}m{name}\x1b[0m: {text}")?
                    }
                    None => writeln!(self.output, "{name}: {text}")?,
                }
            }
            Effect::Echo(text) => writeln!(self.output, "  you: {text}")?,
            Effect::ShowCountries(options) => {
                self.countries = options.iter().map(|(choice, _)| *choice).collect();
                for (idx, (_, label)) in options.iter().enumerate() {
                    writeln!(self.output, "  {}) {}", idx + 1, label)?;
                }
            }
            Effect::ShowInterests(options) => {
                for (idx, label) in options.iter().enumerate() {
                    writeln!(self.output, "  {}) {}", idx + 1, label)?;
                }
                self.interests = options;
            }
            Effect::Submit(request) => {
                let outcome = self.sink.submit(&request);
                match &outcome {
                    Ok(()) => debug!(sink = self.sink.sink_name(), "lead submitted"),
                    Err(err) => {
                        debug!(sink = self.sink.sink_name(), error = %err, "lead submission failed")
                    }
                }
                return Ok(Some(Event::SubmissionFinished(outcome)));
            }
            Effect::OfferHandoff { label, url } => {
                writeln!(self.output, "  {label}: {url}")?;
            }
        }
        Ok(None)
    }

    /// Maps a typed line to an event; menu steps take a number or the option itself.
    fn read_event(&self, step: Step, line: &str) -> Option<Event> {
        match step {
            Step::CountrySelection => pick(&self.countries, line)
                .copied()
                .or_else(|| line.parse::<CountryChoice>().ok())
                .map(Event::SelectCountry),
            Step::Interest => pick(&self.interests, line)
                .or_else(|| {
                    self.interests
                        .iter()
                        .find(|option| option.eq_ignore_ascii_case(line))
                })
                .cloned()
                .map(Event::SelectInterest),
            step if step.accepts_text() => Some(Event::Text(line.to_string())),
            _ => None,
        }
    }

    fn hint(&mut self, step: Step) -> Result<()> {
        let count = match step {
            Step::CountrySelection => self.countries.len(),
            Step::Interest => self.interests.len(),
            _ => return Ok(()),
        };
        writeln!(self.output, "  (pick 1-{count})")?;
        Ok(())
    }
}

fn pick<'v, T>(options: &'v [T], line: &str) -> Option<&'v T> {
    let idx = line.parse::<usize>().ok()?;
    options.get(idx.checked_sub(1)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadline_core::chat::{Catalog, SubmitFailure, WidgetParams};
    use leadline_core::intake::IntakeRequest;
    use std::cell::RefCell;
    use std::io::Cursor;

    #[derive(Default)]
    struct RecordingSink {
        fail: bool,
        seen: RefCell<Vec<IntakeRequest>>,
    }

    impl LeadSink for RecordingSink {
        fn sink_name(&self) -> &'static str {
            "recording"
        }

        fn submit(&self, request: &IntakeRequest) -> Result<(), SubmitFailure> {
            self.seen.borrow_mut().push(request.clone());
            if self.fail {
                Err(SubmitFailure::new("boom"))
            } else {
                Ok(())
            }
        }
    }

    fn run(sink: &RecordingSink, script: &str) -> (ChatState, String) {
        run_with_accent(sink, script, None)
    }

    fn run_with_accent(
        sink: &RecordingSink,
        script: &str,
        accent: Option<(u8, u8, u8)>,
    ) -> (ChatState, String) {
        let conversation = Conversation::new(
            &Catalog::builtin(),
            &WidgetParams::new(Some("colbrew"), Some("en"), None),
        );
        let mut out = Vec::new();
        let state = ChatDriver::new(
            &conversation,
            sink,
            Cursor::new(script.to_string()),
            &mut out,
            Duration::ZERO,
        )
        .with_accent(accent)
        .run()
        .unwrap();
        (state, String::from_utf8(out).unwrap())
    }

    #[test]
    fn scripted_session_submits_once() {
        let sink = RecordingSink::default();
        let (state, transcript) = run(&sink, "Ana\n2\nana@x.com\n5551234567\n1\n");

        assert_eq!(state.step, Step::Success);
        let seen = sink.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].name.as_deref(), Some("Ana"));
        assert_eq!(seen[0].country.as_deref(), Some("USA"));
        assert_eq!(seen[0].phone.as_deref(), Some("+1 5551234567"));
        assert_eq!(seen[0].source.as_deref(), Some("colbrew"));
        assert!(transcript.contains("https://wa.me/"));
    }

    #[test]
    fn menu_accepts_keys_and_reprompts_on_garbage() {
        let sink = RecordingSink::default();
        let (state, transcript) = run(&sink, "Ana\n9\ncolombia\nana@x.com\n3001234567\n");

        assert_eq!(state.step, Step::Interest);
        assert!(transcript.contains("(pick 1-5)"));
        assert_eq!(state.draft.phone, "+57 3001234567");
        assert!(sink.seen.borrow().is_empty());
    }

    #[test]
    fn accent_colors_the_assistant_name() {
        let sink = RecordingSink::default();
        let theme = WidgetParams::new(None, None, Some("1e40af")).theme;
        let (_, colored) = run_with_accent(&sink, "", theme.primary_rgb());
        assert!(colored.contains("\x1b[1;38;2;30;64;175m"));

        let (_, plain) = run(&sink, "");
        assert!(!plain.contains('\x1b'));
    }

    #[test]
    fn failed_submission_ends_in_error() {
        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let (state, _) = run(&sink, "Ana\n1\nana@x.com\n3001234567\n1\n");
        assert_eq!(state.step, Step::Error);
        assert_eq!(sink.seen.borrow().len(), 1);
    }
}

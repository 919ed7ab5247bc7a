use super::catalog::{calling_code, Brand, Catalog, CountryChoice};
use super::locale::Messages;
use super::params::{Lang, WidgetParams};
use crate::domain::{is_valid_email, is_valid_phone, with_calling_code};
use crate::intake::IntakeRequest;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_WHATSAPP_NUMBER: &str = "573127697543";

const WHATSAPP_BASE: &str = "https://wa.me/";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Welcome,
    Name,
    CountrySelection,
    CountryInput,
    Email,
    Phone,
    Interest,
    Submitting,
    Success,
    Error,
}

impl Step {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Step::Success | Step::Error)
    }

    /// Steps that wait for free-text input.
    pub fn accepts_text(&self) -> bool {
        matches!(
            self,
            Step::Name | Step::CountryInput | Step::Email | Step::Phone
        )
    }
}

/// Answers collected so far. Empty strings mean "not answered yet".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub name: String,
    pub country: String,
    pub email: String,
    pub phone: String,
    pub product_interest: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    pub step: Step,
    pub draft: Draft,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SubmitFailure {
    pub message: String,
}

impl SubmitFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start,
    Text(String),
    SelectCountry(CountryChoice),
    SelectInterest(String),
    SubmissionFinished(Result<(), SubmitFailure>),
}

/// Instructions for the driver. Every `Say` is preceded by a typing pause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Say(String),
    Echo(String),
    ShowCountries(Vec<(CountryChoice, String)>),
    ShowInterests(Vec<String>),
    Submit(IntakeRequest),
    OfferHandoff { label: String, url: String },
}

/// One configured conversation: brand, language and lead source are fixed
/// for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    brand: Brand,
    lang: Lang,
    source: String,
    whatsapp_number: String,
}

impl Conversation {
    pub fn new(catalog: &Catalog, params: &WidgetParams) -> Self {
        Self {
            brand: catalog.brand_for_source(&params.source).clone(),
            lang: params.lang,
            source: params.source.clone(),
            whatsapp_number: DEFAULT_WHATSAPP_NUMBER.to_string(),
        }
    }

    pub fn with_whatsapp_number(mut self, number: impl Into<String>) -> Self {
        self.whatsapp_number = number.into();
        self
    }

    pub fn brand(&self) -> &Brand {
        &self.brand
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    fn messages(&self) -> &'static Messages {
        Messages::for_lang(self.lang)
    }

    /// Advances the conversation by one event. Pairs that make no sense for
    /// the current step leave the state untouched and produce no effects.
    pub fn apply(&self, state: ChatState, event: Event) -> (ChatState, Vec<Effect>) {
        let ChatState { step, mut draft } = state;
        let t = self.messages();
        let mut effects = Vec::new();

        let next = match (step, event) {
            (Step::Welcome, Event::Start) => {
                effects.push(say(t.welcome.replace("{brand}", &self.brand.name)));
                effects.push(say(t.ask_name));
                Step::Name
            }
            (step, Event::Text(raw)) if step.accepts_text() => {
                let input = raw.trim();
                if input.is_empty() {
                    step
                } else {
                    self.on_text(step, input, &mut draft, &mut effects)
                }
            }
            (Step::CountrySelection, Event::SelectCountry(choice)) => {
                effects.push(Effect::Echo(t.country_label(choice).to_string()));
                match choice.canonical_name() {
                    Some(country) => {
                        draft.country = country.to_string();
                        effects.push(say(t.perfect));
                        effects.push(say(t.ask_email));
                        Step::Email
                    }
                    None => {
                        effects.push(say(t.ask_country_manual));
                        Step::CountryInput
                    }
                }
            }
            (Step::Interest, Event::SelectInterest(option)) if self.brand.offers(&option) => {
                effects.push(Effect::Echo(option.clone()));
                draft.product_interest = option;
                effects.push(say(t.saving));
                effects.push(Effect::Submit(self.submission(&draft)));
                Step::Submitting
            }
            (Step::Submitting, Event::SubmissionFinished(Ok(()))) => {
                effects.push(say(t.success));
                effects.push(Effect::OfferHandoff {
                    label: t.talk_to_advisor.to_string(),
                    url: self.handoff_url(&draft.name),
                });
                Step::Success
            }
            (Step::Submitting, Event::SubmissionFinished(Err(_))) => {
                effects.push(say(t.error));
                Step::Error
            }
            (step, _) => step,
        };

        (ChatState { step: next, draft }, effects)
    }

    fn on_text(
        &self,
        step: Step,
        input: &str,
        draft: &mut Draft,
        effects: &mut Vec<Effect>,
    ) -> Step {
        let t = self.messages();
        match step {
            Step::Name => {
                draft.name = input.to_string();
                effects.push(Effect::Echo(input.to_string()));
                effects.push(say(t.nice_to_meet.replace("{name}", input)));
                effects.push(say(t.ask_country));
                effects.push(Effect::ShowCountries(
                    CountryChoice::ALL
                        .into_iter()
                        .map(|choice| (choice, t.country_label(choice).to_string()))
                        .collect(),
                ));
                Step::CountrySelection
            }
            Step::CountryInput => {
                draft.country = input.to_string();
                effects.push(Effect::Echo(input.to_string()));
                effects.push(say(t.perfect));
                effects.push(say(t.ask_email));
                Step::Email
            }
            Step::Email => {
                if !is_valid_email(input) {
                    effects.push(say(t.invalid_email));
                    return Step::Email;
                }
                draft.email = input.to_string();
                effects.push(Effect::Echo(input.to_string()));
                effects.push(say(t.ask_phone));
                Step::Phone
            }
            Step::Phone => {
                let phone = with_calling_code(calling_code(&draft.country), input);
                if !is_valid_phone(&phone) {
                    effects.push(say(t.invalid_phone));
                    return Step::Phone;
                }
                effects.push(Effect::Echo(phone.clone()));
                draft.phone = phone;
                effects.push(say(t.one_last_thing));
                let question = self.brand.ask_interest.as_deref().unwrap_or(t.ask_interest);
                effects.push(say(question));
                effects.push(Effect::ShowInterests(self.brand.products.clone()));
                Step::Interest
            }
            other => other,
        }
    }

    fn submission(&self, draft: &Draft) -> IntakeRequest {
        IntakeRequest {
            name: filled(&draft.name),
            phone: filled(&draft.phone),
            email: filled(&draft.email),
            product_interest: filled(&draft.product_interest),
            source: Some(self.source.clone()),
            country: filled(&draft.country),
            ..Default::default()
        }
    }

    /// WhatsApp deep link pre-filled with the brand and the lead's name.
    pub fn handoff_url(&self, name: &str) -> String {
        let text = self
            .messages()
            .handoff
            .replace("{brand}", &self.brand.name)
            .replace("{name}", name);
        format!(
            "{WHATSAPP_BASE}{}?text={}",
            self.whatsapp_number,
            urlencoding::encode(&text)
        )
    }
}

fn say(text: impl Into<String>) -> Effect {
    Effect::Say(text.into())
}

fn filled(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatState, Conversation, Effect, Event, Step, SubmitFailure};
    use crate::chat::{Catalog, CountryChoice, WidgetParams};

    fn conversation(source: &str, lang: &str) -> Conversation {
        Conversation::new(
            &Catalog::builtin(),
            &WidgetParams::new(Some(source), Some(lang), None),
        )
    }

    fn at(step: Step) -> ChatState {
        ChatState {
            step,
            ..Default::default()
        }
    }

    fn text(value: &str) -> Event {
        Event::Text(value.to_string())
    }

    fn says(effects: &[Effect]) -> Vec<&str> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::Say(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn start_greets_with_brand_name() {
        let chat = conversation("colbrew", "es");
        let (state, effects) = chat.apply(ChatState::default(), Event::Start);
        assert_eq!(state.step, Step::Name);
        assert_eq!(
            says(&effects),
            vec!["¡Hola! 👋 Soy el asistente de ColBrew Coffee.", "¿Cómo te llamas?"]
        );
    }

    #[test]
    fn name_step_records_trimmed_name_and_offers_countries() {
        let chat = conversation("Chat Widget Web", "es");
        let (state, effects) = chat.apply(at(Step::Name), text("  Ana "));
        assert_eq!(state.step, Step::CountrySelection);
        assert_eq!(state.draft.name, "Ana");
        assert_eq!(effects[0], Effect::Echo("Ana".to_string()));
        assert!(says(&effects).contains(&"¡Qué gusto saludarte, Ana! 😊"));
        assert!(
            matches!(effects.last(), Some(Effect::ShowCountries(options)) if options.len() == 5)
        );
    }

    #[test]
    fn blank_input_is_ignored() {
        let chat = conversation("x", "es");
        let before = at(Step::Name);
        let (state, effects) = chat.apply(before.clone(), text("   "));
        assert_eq!(state, before);
        assert!(effects.is_empty());
    }

    #[test]
    fn invalid_email_reprompts_without_echo() {
        let chat = conversation("x", "en");
        let (state, effects) = chat.apply(at(Step::Email), text("bob@"));
        assert_eq!(state.step, Step::Email);
        assert_eq!(state.draft.email, "");
        assert_eq!(effects, vec![Effect::Say("Please enter a valid email.".to_string())]);

        let (state, effects) = chat.apply(state, text("bob@example.com"));
        assert_eq!(state.step, Step::Phone);
        assert_eq!(state.draft.email, "bob@example.com");
        assert_eq!(effects[0], Effect::Echo("bob@example.com".to_string()));
    }

    #[test]
    fn phone_gets_calling_code_for_known_country() {
        let chat = conversation("x", "es");
        let mut state = at(Step::Phone);
        state.draft.country = "Colombia".to_string();
        let (state, effects) = chat.apply(state, text("3001234567"));
        assert_eq!(state.step, Step::Interest);
        assert_eq!(state.draft.phone, "+57 3001234567");
        assert_eq!(effects[0], Effect::Echo("+57 3001234567".to_string()));
    }

    #[test]
    fn short_phone_is_rejected() {
        let chat = conversation("x", "es");
        let mut state = at(Step::Phone);
        state.draft.country = "Peru".to_string();
        let (state, effects) = chat.apply(state, text("12345"));
        assert_eq!(state.step, Step::Phone);
        assert_eq!(
            says(&effects),
            vec!["Por favor ingresa un número válido (mínimo 10 dígitos con código)."]
        );
    }

    #[test]
    fn other_country_goes_to_manual_input() {
        let chat = conversation("x", "es");
        let (state, effects) =
            chat.apply(at(Step::CountrySelection), Event::SelectCountry(CountryChoice::Other));
        assert_eq!(state.step, Step::CountryInput);
        assert_eq!(state.draft.country, "");
        assert_eq!(effects[0], Effect::Echo("🌍 Otro".to_string()));

        let (state, _) = chat.apply(state, text("Perú"));
        assert_eq!(state.step, Step::Email);
        assert_eq!(state.draft.country, "Perú");
    }

    #[test]
    fn preset_country_stores_canonical_name() {
        let chat = conversation("x", "en");
        let (state, effects) =
            chat.apply(at(Step::CountrySelection), Event::SelectCountry(CountryChoice::Spain));
        assert_eq!(state.step, Step::Email);
        assert_eq!(state.draft.country, "España");
        assert_eq!(effects[0], Effect::Echo("🇪🇸 Spain".to_string()));
        assert_eq!(says(&effects), vec!["Perfect!", "What is your email address?"]);
    }

    #[test]
    fn brand_question_overrides_localized_interest_prompt() {
        let chat = conversation("Empanadas Paisanas", "en");
        let (_, effects) = chat.apply(at(Step::Phone), text("+57 3001234567"));
        assert!(says(&effects).contains(&"¿En qué podemos asesorarte el día de hoy?"));
        assert_eq!(
            effects.last(),
            Some(&Effect::ShowInterests(vec![
                "Empanadas".to_string(),
                "Franquicias".to_string()
            ]))
        );
    }

    #[test]
    fn unknown_interest_is_ignored() {
        let chat = conversation("colbrew", "es");
        let (state, effects) =
            chat.apply(at(Step::Interest), Event::SelectInterest("Catas".to_string()));
        assert_eq!(state.step, Step::Interest);
        assert!(effects.is_empty());
    }

    #[test]
    fn mismatched_events_leave_state_untouched() {
        let chat = conversation("x", "es");
        for (step, event) in [
            (Step::Welcome, text("hi")),
            (Step::Name, Event::Start),
            (Step::Email, Event::SelectCountry(CountryChoice::Usa)),
            (Step::CountrySelection, text("Colombia")),
            (Step::Success, Event::SubmissionFinished(Ok(()))),
            (Step::Error, text("retry")),
        ] {
            let (state, effects) = chat.apply(at(step), event);
            assert_eq!(state.step, step);
            assert!(effects.is_empty());
        }
    }

    #[test]
    fn submission_failure_is_terminal() {
        let chat = conversation("x", "en");
        let (state, effects) = chat.apply(
            at(Step::Submitting),
            Event::SubmissionFinished(Err(SubmitFailure::new("503"))),
        );
        assert_eq!(state.step, Step::Error);
        assert!(state.step.is_terminal());
        assert_eq!(
            says(&effects),
            vec!["Oops, I had a problem saving your data. Please try again."]
        );
    }

    #[test]
    fn full_conversation_submits_every_answer() {
        let chat = conversation("colbrew", "en");
        let mut state = ChatState::default();
        let mut submitted = None;
        let events = vec![
            Event::Start,
            text("Ana"),
            Event::SelectCountry(CountryChoice::Usa),
            text("ana@x.com"),
            text("5551234567"),
            Event::SelectInterest("Elixir Original".to_string()),
        ];
        for event in events {
            let (next, effects) = chat.apply(state, event);
            state = next;
            for effect in effects {
                if let Effect::Submit(request) = effect {
                    submitted = Some(request);
                }
            }
        }

        assert_eq!(state.step, Step::Submitting);
        let request = submitted.expect("submit effect");
        assert_eq!(request.name.as_deref(), Some("Ana"));
        assert_eq!(request.country.as_deref(), Some("USA"));
        assert_eq!(request.email.as_deref(), Some("ana@x.com"));
        assert_eq!(request.phone.as_deref(), Some("+1 5551234567"));
        assert_eq!(request.product_interest.as_deref(), Some("Elixir Original"));
        assert_eq!(request.source.as_deref(), Some("colbrew"));

        let (state, effects) = chat.apply(state, Event::SubmissionFinished(Ok(())));
        assert_eq!(state.step, Step::Success);
        let Some(Effect::OfferHandoff { label, url }) = effects.last() else {
            panic!("expected handoff effect");
        };
        assert_eq!(label, "Talk to an advisor");
        assert!(url.starts_with("https://wa.me/573127697543?text=Hello%2C%20I%20just"));
        assert!(url.contains("ColBrew%20Coffee"));
        assert!(url.ends_with("My%20name%20is%20Ana."));
    }

    #[test]
    fn handoff_uses_configured_number() {
        let chat = conversation("x", "es").with_whatsapp_number("15550001111");
        let url = chat.handoff_url("Luis");
        assert!(url.starts_with("https://wa.me/15550001111?text=Hola%2C"));
        assert!(url.contains("Empanadas%20Lab"));
    }
}

use super::catalog::CountryChoice;
use super::params::Lang;

/// Localized bot lines. `{brand}` and `{name}` are substituted by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Messages {
    pub welcome: &'static str,
    pub ask_name: &'static str,
    pub nice_to_meet: &'static str,
    pub ask_country: &'static str,
    pub ask_country_manual: &'static str,
    pub ask_email: &'static str,
    pub perfect: &'static str,
    pub ask_phone: &'static str,
    pub one_last_thing: &'static str,
    pub ask_interest: &'static str,
    pub saving: &'static str,
    pub success: &'static str,
    pub error: &'static str,
    pub invalid_email: &'static str,
    pub invalid_phone: &'static str,
    pub talk_to_advisor: &'static str,
    pub handoff: &'static str,
    countries: [&'static str; 5],
}

const ES: Messages = Messages {
    welcome: "¡Hola! 👋 Soy el asistente de {brand}.",
    ask_name: "¿Cómo te llamas?",
    nice_to_meet: "¡Qué gusto saludarte, {name}! 😊",
    ask_country: "¿Desde qué país nos escribes?",
    ask_country_manual: "Por favor, escribe el nombre de tu país:",
    ask_email: "¿Cuál es tu correo electrónico?",
    perfect: "¡Perfecto!",
    ask_phone: "¿A qué número de WhatsApp podemos contactarte?",
    one_last_thing: "Una última cosa...",
    ask_interest: "¿En cuál de nuestros productos estás interesado?",
    saving: "¡Excelente elección! Estoy guardando tus datos...",
    success: "¡Listo! Uno de nuestros asesores te contactará muy pronto.",
    error: "Ups, tuve un problema al guardar tus datos. Por favor intenta de nuevo.",
    invalid_email: "Por favor ingresa un correo válido.",
    invalid_phone: "Por favor ingresa un número válido (mínimo 10 dígitos con código).",
    talk_to_advisor: "Hablar con un asesor",
    handoff: "Hola, acabo de dejar mis datos en el chat de {brand} y me gustaría hablar con un asesor. Mi nombre es {name}.",
    countries: [
        "🇨🇴 Colombia",
        "🇺🇸 USA",
        "🇨🇦 Canadá",
        "🇪🇸 España",
        "🌍 Otro",
    ],
};

const EN: Messages = Messages {
    welcome: "Hello! 👋 I'm the assistant from {brand}.",
    ask_name: "What is your name?",
    nice_to_meet: "Nice to meet you, {name}! 😊",
    ask_country: "Which country are you writing from?",
    ask_country_manual: "Please type the name of your country:",
    ask_email: "What is your email address?",
    perfect: "Perfect!",
    ask_phone: "What is your WhatsApp number?",
    one_last_thing: "One last thing...",
    ask_interest: "Which of our products are you interested in?",
    saving: "Great choice! I'm saving your data...",
    success: "Done! One of our advisors will contact you very soon.",
    error: "Oops, I had a problem saving your data. Please try again.",
    invalid_email: "Please enter a valid email.",
    invalid_phone: "Please enter a valid number (min 7 digits).",
    talk_to_advisor: "Talk to an advisor",
    handoff: "Hello, I just left my details in the {brand} chat and would like to speak with an advisor. My name is {name}.",
    countries: [
        "🇨🇴 Colombia",
        "🇺🇸 USA",
        "🇨🇦 Canada",
        "🇪🇸 Spain",
        "🌍 Other",
    ],
};

impl Messages {
    pub fn for_lang(lang: Lang) -> &'static Messages {
        match lang {
            Lang::Es => &ES,
            Lang::En => &EN,
        }
    }

    pub fn country_label(&self, choice: CountryChoice) -> &'static str {
        self.countries[choice.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::Messages;
    use crate::chat::{CountryChoice, Lang};

    #[test]
    fn country_labels_are_localized() {
        let es = Messages::for_lang(Lang::Es);
        let en = Messages::for_lang(Lang::En);
        assert_eq!(es.country_label(CountryChoice::Canada), "🇨🇦 Canadá");
        assert_eq!(en.country_label(CountryChoice::Spain), "🇪🇸 Spain");
        assert_eq!(en.country_label(CountryChoice::Other), "🌍 Other");
    }
}

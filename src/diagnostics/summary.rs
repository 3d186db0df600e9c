//! Summaries of the faults found in a background file.

use crate::alphabet::Alphabet;

/// A message to show to the user.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Message {
    /// Whether the message describes an error (as opposed to a warning).
    is_error: bool,

    /// The message.
    message: String,

    /// The reasons behind the message.
    reasons: Vec<String>,
}

impl Message {
    /// Creates a new [`Message`].
    pub fn new(is_error: bool, message: impl Into<String>, reasons: Vec<String>) -> Self {
        Self {
            is_error,
            message: message.into(),
            reasons,
        }
    }

    /// Returns whether the message describes an error.
    pub fn is_error(&self) -> bool {
        self.is_error
    }

    /// Gets the message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Gets the reasons behind the message.
    pub fn reasons(&self) -> &[String] {
        &self.reasons
    }
}

impl std::fmt::Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{level}: {}", self.message)?;

        for reason in &self.reasons {
            write!(f, "\n    {reason}")?;
        }

        Ok(())
    }
}

/// A summary of everything found in a background file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Summary {
    /// Whether any message is an error.
    error: bool,

    /// Whether any message is a warning.
    warning: bool,

    /// The alphabet of the file.
    alphabet: Alphabet,

    /// The messages, in the order they should be shown.
    messages: Vec<Message>,
}

impl Summary {
    /// Creates an empty [`Summary`] for a file of the given alphabet.
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            ..Default::default()
        }
    }

    /// Appends a message.
    ///
    /// # Examples
    ///
    /// ```
    /// use bgfile::diagnostics::Summary;
    /// use bgfile::Alphabet;
    ///
    /// let mut summary = Summary::new(Alphabet::Dna);
    /// summary.add(false, "Large file", vec![String::from("File is 2MB")]);
    ///
    /// assert!(!summary.is_error());
    /// assert!(summary.is_warning());
    /// assert_eq!(summary.messages()[0].to_string(), "warning: Large file\n    File is 2MB");
    /// ```
    pub fn add(&mut self, is_error: bool, message: impl Into<String>, reasons: Vec<String>) {
        if is_error {
            self.error = true;
        } else {
            self.warning = true;
        }

        self.messages.push(Message::new(is_error, message, reasons));
    }

    /// Returns whether any message is an error.
    pub fn is_error(&self) -> bool {
        self.error
    }

    /// Returns whether any message is a warning.
    pub fn is_warning(&self) -> bool {
        self.warning
    }

    /// Gets the alphabet of the file.
    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    /// Gets the messages.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for message in &self.messages {
            writeln!(f, "{message}")?;
        }

        Ok(())
    }
}

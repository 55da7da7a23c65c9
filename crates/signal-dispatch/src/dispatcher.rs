//! Dispatcher Implementation

use crate::tokens::{Token, TokenMap};
use crate::DispatchError;
use face_signals::SignalSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Destination for token lists (UDP socket, WebSocket, stdout, ...)
pub trait SignalSink {
    fn send(&mut self, tokens: &[String]) -> Result<(), DispatchError>;
}

/// Writes one comma-separated line per message
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SignalSink for WriterSink<W> {
    fn send(&mut self, tokens: &[String]) -> Result<(), DispatchError> {
        writeln!(self.writer, "{}", tokens.join(","))?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Dispatch configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Token names
    pub tokens: TokenMap,
    /// Minimum gap between repeats of a held level token (milliseconds).
    /// `None` sends level tokens on every frame.
    pub level_repeat_ms: Option<u64>,
}

/// Turns signal sets into token messages.
///
/// Pulse tokens are always sent. Level tokens are resent while held,
/// optionally rate-limited per token. Empty messages are never sent.
pub struct Dispatcher<S> {
    config: DispatchConfig,
    sink: S,
    /// Last send time of each level token still held
    held: HashMap<Token, Duration>,
    sent: usize,
}

impl<S: SignalSink> Dispatcher<S> {
    pub fn new(config: DispatchConfig, sink: S) -> Self {
        info!("Creating dispatcher with config: {:?}", config);
        Self {
            config,
            sink,
            held: HashMap::new(),
            sent: 0,
        }
    }

    /// Dispatch one frame's signals. Returns the token names sent, if any.
    pub fn dispatch(
        &mut self,
        timestamp: Duration,
        signals: &SignalSet,
    ) -> Result<Option<Vec<String>>, DispatchError> {
        let active = Token::collect(signals);

        // Released levels restart their repeat clock
        self.held.retain(|token, _| active.contains(token));

        let due: Vec<Token> = active
            .into_iter()
            .filter(|token| token.is_pulse() || self.level_due(*token, timestamp))
            .collect();

        if due.is_empty() {
            return Ok(None);
        }

        let names: Vec<String> = due
            .iter()
            .map(|t| self.config.tokens.name(*t).to_string())
            .collect();

        if let Err(e) = self.sink.send(&names) {
            metrics::counter!("face_signals_dispatch_errors_total").increment(1);
            warn!("Failed to send {:?}: {}", names, e);
            return Err(e);
        }

        // Only delivered levels start a repeat interval
        for token in due.iter().filter(|t| !t.is_pulse()) {
            self.held.insert(*token, timestamp);
        }

        self.sent += 1;
        metrics::counter!("face_signals_messages_sent_total").increment(1);
        debug!("Sent {:?}", names);
        Ok(Some(names))
    }

    fn level_due(&self, token: Token, now: Duration) -> bool {
        let (Some(repeat_ms), Some(last)) = (self.config.level_repeat_ms, self.held.get(&token))
        else {
            return true;
        };
        now.saturating_sub(*last) >= Duration::from_millis(repeat_ms)
    }

    /// Messages sent so far
    pub fn sent(&self) -> usize {
        self.sent
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use face_signals::EyeExpression;

    #[derive(Default)]
    struct Collecting(Vec<Vec<String>>);

    impl SignalSink for Collecting {
        fn send(&mut self, tokens: &[String]) -> Result<(), DispatchError> {
            self.0.push(tokens.to_vec());
            Ok(())
        }
    }

    struct Failing;

    impl SignalSink for Failing {
        fn send(&mut self, _tokens: &[String]) -> Result<(), DispatchError> {
            Err(DispatchError::Sink("closed".into()))
        }
    }

    /// Rejects the first `failures` messages, then collects
    #[derive(Default)]
    struct Flaky {
        failures: usize,
        delivered: Vec<Vec<String>>,
    }

    impl SignalSink for Flaky {
        fn send(&mut self, tokens: &[String]) -> Result<(), DispatchError> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(DispatchError::Sink("unreachable".into()));
            }
            self.delivered.push(tokens.to_vec());
            Ok(())
        }
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn head_left() -> SignalSet {
        SignalSet {
            face_detected: true,
            head_left: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_set_suppressed() {
        let mut dispatcher = Dispatcher::new(DispatchConfig::default(), Collecting::default());

        let idle = SignalSet {
            face_detected: true,
            eye_expression: EyeExpression::BothClosed,
            ..Default::default()
        };
        assert!(dispatcher.dispatch(ms(0), &idle).unwrap().is_none());
        assert!(dispatcher.dispatch(ms(33), &SignalSet::no_face()).unwrap().is_none());
        assert_eq!(dispatcher.sent(), 0);
        assert!(dispatcher.sink().0.is_empty());
    }

    #[test]
    fn test_levels_repeat_every_frame_by_default() {
        let mut dispatcher = Dispatcher::new(DispatchConfig::default(), Collecting::default());
        for i in 0..3 {
            dispatcher.dispatch(ms(i * 33), &head_left()).unwrap();
        }
        assert_eq!(dispatcher.sink().0, vec![vec!["HEAD_LEFT".to_string()]; 3]);
    }

    #[test]
    fn test_level_repeat_interval() {
        let config = DispatchConfig {
            level_repeat_ms: Some(100),
            ..Default::default()
        };
        let mut dispatcher = Dispatcher::new(config, Collecting::default());

        let sent: Vec<bool> = [0, 33, 66, 99, 132]
            .iter()
            .map(|&t| dispatcher.dispatch(ms(t), &head_left()).unwrap().is_some())
            .collect();
        assert_eq!(sent, vec![true, false, false, false, true]);

        // Releasing and re-entering sends immediately
        dispatcher.dispatch(ms(165), &SignalSet::default()).unwrap();
        assert!(dispatcher.dispatch(ms(198), &head_left()).unwrap().is_some());
    }

    #[test]
    fn test_pulses_bypass_repeat_limit() {
        let config = DispatchConfig {
            level_repeat_ms: Some(1000),
            ..Default::default()
        };
        let mut dispatcher = Dispatcher::new(config, Collecting::default());
        dispatcher.dispatch(ms(0), &head_left()).unwrap();

        let with_pulse = SignalSet {
            eye_closed_pulse: true,
            ..head_left()
        };
        let names = dispatcher.dispatch(ms(33), &with_pulse).unwrap().unwrap();
        assert_eq!(names, vec!["EYES_CLOSED".to_string()]);
    }

    #[test]
    fn test_custom_token_names() {
        let mut config = DispatchConfig::default();
        config.tokens.eyes_activate = "JUMP".into();
        let mut dispatcher = Dispatcher::new(config, Collecting::default());

        let signals = SignalSet {
            face_detected: true,
            eye_activate_pulse: true,
            mouth_open: true,
            ..Default::default()
        };
        let names = dispatcher.dispatch(ms(0), &signals).unwrap().unwrap();
        assert_eq!(names, vec!["JUMP".to_string(), "MOUTH_OPEN".to_string()]);
    }

    #[test]
    fn test_sink_error_surfaces() {
        let mut dispatcher = Dispatcher::new(DispatchConfig::default(), Failing);
        assert!(matches!(
            dispatcher.dispatch(ms(0), &head_left()),
            Err(DispatchError::Sink(_))
        ));
        assert_eq!(dispatcher.sent(), 0);
    }

    #[test]
    fn test_failed_level_send_is_retried_next_frame() {
        let config = DispatchConfig {
            level_repeat_ms: Some(1000),
            ..Default::default()
        };
        let sink = Flaky {
            failures: 1,
            ..Default::default()
        };
        let mut dispatcher = Dispatcher::new(config, sink);

        assert!(dispatcher.dispatch(ms(0), &head_left()).is_err());
        let names = dispatcher.dispatch(ms(33), &head_left()).unwrap();
        assert_eq!(names, Some(vec!["HEAD_LEFT".to_string()]));

        // Delivered now, so the interval applies from here
        assert!(dispatcher.dispatch(ms(66), &head_left()).unwrap().is_none());
        assert_eq!(dispatcher.sink().delivered.len(), 1);
        assert_eq!(dispatcher.sent(), 1);
    }

    #[test]
    fn test_writer_sink_format() {
        let mut dispatcher = Dispatcher::new(DispatchConfig::default(), WriterSink::new(Vec::new()));
        let signals = SignalSet {
            smile: true,
            head_up: true,
            ..Default::default()
        };
        dispatcher.dispatch(ms(0), &signals).unwrap();

        let out = String::from_utf8(dispatcher.into_sink().into_inner()).unwrap();
        assert_eq!(out, "SMILE,HEAD_UP\n");
    }
}

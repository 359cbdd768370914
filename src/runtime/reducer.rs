use crate::core::workflow::Stage;
use crate::runtime::command::Command;
use crate::runtime::effect::Effect;
use crate::runtime::event::TimerEvent;
use crate::state::App;
use crate::task::JobOutcome;
use crate::terminal::KeyCode;

pub struct Reducer;

impl Reducer {
    pub fn reduce(state: &mut App, command: Command) -> Vec<Effect> {
        let mut effects = match command {
            Command::Exit => {
                state.request_exit();
                vec![Effect::RequestRender]
            }
            Command::Tick => {
                if state.tick() {
                    vec![Effect::RequestRender]
                } else {
                    vec![]
                }
            }
            Command::Noop => vec![],
            _ if state.back_prompt().is_some() => {
                if Self::answer_prompt(state, command) {
                    vec![Effect::RequestRender]
                } else {
                    vec![]
                }
            }
            _ => {
                match state.stage() {
                    Stage::Upload => state.upload_command(command),
                    Stage::Config => state.config_command(command),
                    Stage::Editor => state.editor_command(command),
                }
                vec![Effect::RequestRender]
            }
        };

        effects.extend(state.take_pending_effects());
        effects
    }

    /// While a backward move waits for confirmation only the prompt's own
    /// answers are accepted.
    fn answer_prompt(state: &mut App, command: Command) -> bool {
        let confirm = match command {
            Command::Submit => true,
            Command::Cancel => false,
            Command::InputKey(key) => match key.code {
                KeyCode::Char('y' | 'Y') => true,
                KeyCode::Char('n' | 'N') => false,
                _ => return false,
            },
            _ => return false,
        };
        if confirm {
            state.confirm_back();
        } else {
            state.cancel_back();
        }
        true
    }

    pub fn on_job(state: &mut App, outcome: JobOutcome) -> Vec<Effect> {
        let changed = match outcome {
            JobOutcome::Decoded {
                run_id,
                path,
                result,
            } => state.on_decoded(run_id, &path, result),
            JobOutcome::Probed {
                generation,
                index,
                verdict,
            } => state.on_probed(generation, index, verdict),
        };
        Self::finish(state, changed)
    }

    pub fn on_timer(state: &mut App, event: TimerEvent) -> Vec<Effect> {
        let changed = state.on_timer(event);
        Self::finish(state, changed)
    }

    fn finish(state: &mut App, changed: bool) -> Vec<Effect> {
        let mut effects = if changed {
            vec![Effect::RequestRender]
        } else {
            vec![]
        };
        effects.extend(state.take_pending_effects());
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::{FieldValue, Record};
    use crate::runtime::scheduler::SchedulerCommand;
    use crate::state::{Screen, Settings};
    use crate::task::Job;
    use crate::terminal::KeyEvent;
    use std::path::PathBuf;

    fn type_text(state: &mut App, text: &str) {
        for ch in text.chars() {
            Reducer::reduce(state, Command::InputKey(KeyEvent::plain(KeyCode::Char(ch))));
        }
    }

    fn decode_run(effects: &[Effect]) -> Option<(u64, PathBuf)> {
        effects.iter().find_map(|effect| match effect {
            Effect::Spawn(Job::Decode { run_id, path }) => Some((*run_id, path.clone())),
            _ => None,
        })
    }

    fn rows() -> Vec<Record> {
        vec![
            [("name", FieldValue::text("Widget"))].into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        ]
    }

    fn app_in_config() -> App {
        let mut state = App::new(Settings::default());
        type_text(&mut state, "items.csv");
        let effects = Reducer::reduce(&mut state, Command::Submit);
        let (run_id, path) = decode_run(&effects).expect("decode job");
        Reducer::on_job(
            &mut state,
            JobOutcome::Decoded {
                run_id,
                path,
                result: Ok(rows()),
            },
        );
        state
    }

    #[test]
    fn submitting_a_path_spawns_a_decode() {
        let mut state = App::new(Settings::default());
        type_text(&mut state, "data.json");
        let effects = Reducer::reduce(&mut state, Command::Submit);
        let (_, path) = decode_run(&effects).expect("decode job");
        assert_eq!(path, PathBuf::from("data.json"));
        assert!(matches!(state.screen(), Screen::Upload(u) if u.is_loading()));

        // A second submit while loading is ignored.
        let effects = Reducer::reduce(&mut state, Command::Submit);
        assert!(decode_run(&effects).is_none());
    }

    #[test]
    fn decode_failure_stays_on_upload_with_message() {
        let mut state = App::new(Settings::default());
        type_text(&mut state, "empty.csv");
        let effects = Reducer::reduce(&mut state, Command::Submit);
        let (run_id, path) = decode_run(&effects).expect("decode job");
        Reducer::on_job(
            &mut state,
            JobOutcome::Decoded {
                run_id,
                path,
                result: Err(crate::error::DecodeError::Empty),
            },
        );
        assert_eq!(state.stage(), Stage::Upload);
        match state.screen() {
            Screen::Upload(upload) => {
                assert!(!upload.is_loading());
                assert!(upload.error().is_some_and(|e| e.contains("empty.csv")));
            }
            other => panic!("unexpected screen: {other:?}"),
        }
    }

    #[test]
    fn completion_of_an_older_run_is_dropped() {
        let mut state = App::new(Settings::default());
        type_text(&mut state, "a.csv");
        let effects = Reducer::reduce(&mut state, Command::Submit);
        let (first, path) = decode_run(&effects).expect("decode job");
        let effects = Reducer::on_job(
            &mut state,
            JobOutcome::Decoded {
                run_id: first.wrapping_sub(1),
                path,
                result: Ok(rows()),
            },
        );
        assert!(effects.is_empty());
        assert_eq!(state.stage(), Stage::Upload);
    }

    #[test]
    fn back_prompt_accepts_only_answers() {
        let mut state = app_in_config();
        assert_eq!(state.stage(), Stage::Config);

        Reducer::reduce(&mut state, Command::Cancel);
        assert!(state.back_prompt().is_some());

        Reducer::reduce(&mut state, Command::Save);
        assert_eq!(state.stage(), Stage::Config);
        assert!(state.back_prompt().is_some());

        Reducer::reduce(&mut state, Command::InputKey(KeyEvent::plain(KeyCode::Char('n'))));
        assert!(state.back_prompt().is_none());
        assert_eq!(state.stage(), Stage::Config);

        Reducer::reduce(&mut state, Command::Cancel);
        Reducer::reduce(&mut state, Command::Submit);
        assert_eq!(state.stage(), Stage::Upload);
        assert!(state.workflow().raw_data().is_empty());
    }

    #[test]
    fn confirming_schema_enters_editor_and_save_notifies() {
        let mut state = app_in_config();
        Reducer::reduce(&mut state, Command::Save);
        assert_eq!(state.stage(), Stage::Editor);

        type_text(&mut state, " Pro");
        let effects = Reducer::reduce(&mut state, Command::Save);
        assert_eq!(
            state.workflow().data()[0].get("name"),
            Some(&FieldValue::text("Widget Pro"))
        );
        assert_eq!(state.workflow().raw_data()[0].get("name"), Some(&FieldValue::text("Widget")));

        let id = state.notice().map(|n| n.id).expect("notice shown");
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::Schedule(SchedulerCommand::EmitAfter { event: TimerEvent::DismissNotice { id: got }, .. }) if *got == id
        )));

        Reducer::on_timer(&mut state, TimerEvent::DismissNotice { id });
        assert!(state.notice().is_none());
    }

    #[test]
    fn exit_works_while_prompt_is_open() {
        let mut state = app_in_config();
        Reducer::reduce(&mut state, Command::Cancel);
        Reducer::reduce(&mut state, Command::Exit);
        assert!(state.should_exit());
    }
}

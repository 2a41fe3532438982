#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Ask(String),
    Quit,
    Skip,
}

const QUIT_COMMANDS: &[&str] = &["/quit", "/exit"];

pub fn transition(state: LoopState, line: &str) -> (LoopState, Action) {
    if state == LoopState::Terminated {
        return (LoopState::Terminated, Action::Skip);
    }

    let input = line.trim();
    if input.is_empty() {
        return (LoopState::Running, Action::Skip);
    }

    if QUIT_COMMANDS.contains(&input.to_lowercase().as_str()) {
        return (LoopState::Terminated, Action::Quit);
    }

    (LoopState::Running, Action::Ask(input.to_string()))
}

//! Proptest strategies for driving the manager with user-level operations.

use appmgr_core::actions::ActionId;
use appmgr_core::orchestration::PhoneMode;
use proptest::prelude::*;

pub const APPLICATIONS: &[&str] = &[
    "ApplicationDesktop",
    "ApplicationClock",
    "ApplicationSettings",
    "ApplicationMessages",
    "ApplicationCall",
    "ApplicationAlarm",
];

/// Something a user or a system service does to the phone.
#[derive(Debug, Clone)]
pub enum Operation {
    Switch(&'static str),
    SwitchBack,
    Finish,
    Action(ActionId),
    Launch(&'static str),
    PhoneMode(PhoneMode),
    Break(&'static str),
}

pub fn application_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(APPLICATIONS)
}

pub fn action_strategy() -> impl Strategy<Value = ActionId> {
    prop_oneof![
        Just(ActionId::Home),
        Just(ActionId::ShowPopup),
        Just(ActionId::custom("ShowSms")),
        Just(ActionId::custom("IncomingCall")),
        Just(ActionId::custom("AlarmRing")),
        Just(ActionId::custom("Unhandled")),
    ]
}

pub fn phone_mode_strategy() -> impl Strategy<Value = PhoneMode> {
    prop_oneof![
        Just(PhoneMode::Connected),
        Just(PhoneMode::DoNotDisturb),
        Just(PhoneMode::Offline),
    ]
}

pub fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        4 => application_strategy().prop_map(Operation::Switch),
        2 => Just(Operation::SwitchBack),
        1 => Just(Operation::Finish),
        3 => action_strategy().prop_map(Operation::Action),
        2 => application_strategy().prop_map(Operation::Launch),
        1 => phone_mode_strategy().prop_map(Operation::PhoneMode),
        1 => application_strategy().prop_map(Operation::Break),
    ]
}

pub fn operations_strategy() -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(operation_strategy(), 1..40)
}

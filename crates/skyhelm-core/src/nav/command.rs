/// Command interpretation: tokenize, classify, dispatch by shape.
///
/// Input is split on whitespace and lowercased per token. A short table of
/// fixed phrases is checked first; everything else goes through five
/// non-exclusive token classifications and a strict arity dispatch. The
/// interpreter never fails fatally — every path lands on one of the three
/// [`CommandOutcome`]s.
use glam::Vec3;
use log::{info, warn};

use crate::api::sim::SimContext;
use crate::api::types::{BodyId, CommandOutcome, HostEvent};
use crate::nav::autopilot::Navigator;

/// Verbs that take a celestial-body argument.
pub const AUTOPILOT_VERBS: &[&str] = &["fly", "go", "look", "orbit", "track", "follow", "jump"];

/// Verbs that take a binary object argument.
pub const BINARY_VERBS: &[&str] = &[
    "enter", "exit", "leave", "faster", "slower", "increase", "decrease", "double", "half", "halve",
];

/// Objects a binary verb or a set command can act on.
pub const BINARY_OBJECTS: &[&str] = &["orbit", "time", "speed", "elevation", "weather", "climate"];

/// Single-word commands.
pub const IMPERATIVES: &[&str] = &[
    "picture", "snapshot", "clouds", "atmosphere", "reset", "zero", "pause", "resume", "stop",
    "faster", "slower", "lock", "unlock", "mark", "set", "front", "credits",
];

/// Half-angle cosine of the view cone used for "what is that" scans: a body
/// within 60 degrees of the craft's forward axis counts as visible.
const VIEW_CONE_COS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phrase {
    WhatsThat,
    Quit,
}

/// Canned word-for-word phrases, matched before any classification.
const PHRASES: &[(&[&str], Phrase)] = &[
    (&["what", "is", "that"], Phrase::WhatsThat),
    (&["what's", "that"], Phrase::WhatsThat),
    (&["drop", "dead"], Phrase::Quit),
];

/// One input word with its non-exclusive classifications.
#[derive(Debug, Clone)]
struct Token {
    text: String,
    body: Option<BodyId>,
    imperative: bool,
    binary_verb: bool,
    binary_object: bool,
    autopilot_verb: bool,
}

fn classify(words: Vec<String>, ctx: &SimContext) -> Vec<Token> {
    words
        .into_iter()
        .map(|text| Token {
            body: ctx.arena.find(&text),
            imperative: IMPERATIVES.contains(&text.as_str()),
            binary_verb: BINARY_VERBS.contains(&text.as_str()),
            binary_object: BINARY_OBJECTS.contains(&text.as_str()),
            autopilot_verb: AUTOPILOT_VERBS.contains(&text.as_str()),
            text,
        })
        .collect()
}

fn scan_phrases(words: &[String]) -> Option<Phrase> {
    PHRASES
        .iter()
        .find(|(phrase, _)| {
            phrase.len() == words.len() && phrase.iter().zip(words).all(|(p, w)| *p == w)
        })
        .map(|(_, action)| *action)
}

/// Interpret one utterance against the navigator and context.
pub fn parse(input: &str, nav: &mut Navigator, ctx: &mut SimContext) -> CommandOutcome {
    let words: Vec<String> = input.split_whitespace().map(str::to_lowercase).collect();
    if words.is_empty() {
        return CommandOutcome::NotUnderstood;
    }

    if let Some(phrase) = scan_phrases(&words) {
        match phrase {
            Phrase::WhatsThat => whats_that(nav, ctx),
            Phrase::Quit => ctx.emit(HostEvent::Quit),
        }
        return CommandOutcome::Completed;
    }

    let tokens = classify(words, ctx);
    let bodies: Vec<BodyId> = tokens.iter().filter_map(|t| t.body).collect();
    let imperatives: Vec<String> =
        tokens.iter().filter(|t| t.imperative).map(|t| t.text.clone()).collect();
    let binary_verbs: Vec<String> =
        tokens.iter().filter(|t| t.binary_verb).map(|t| t.text.clone()).collect();
    let binary_objects: Vec<String> =
        tokens.iter().filter(|t| t.binary_object).map(|t| t.text.clone()).collect();
    let autopilot_verbs: Vec<String> =
        tokens.iter().filter(|t| t.autopilot_verb).map(|t| t.text.clone()).collect();

    let n = tokens.len();
    let outcome = if binary_objects.len() == 1
        && ((n == 4 && tokens[0].text == "set" && tokens[2].text == "to")
            || (n == 3 && tokens[0].text == "set"))
    {
        handle_set(&binary_objects[0], &tokens[n - 1].text, nav, ctx)
    } else if n == 1 && imperatives.len() == 1 {
        handle_imperative(&imperatives[0], nav, ctx)
    } else if autopilot_verbs.len() == 1 && bodies.len() == 1 {
        handle_autopilot(&autopilot_verbs[0], bodies[0], nav, ctx)
    } else if binary_verbs.len() == 1 && binary_objects.len() == 1 {
        handle_binary(&binary_verbs[0], &binary_objects[0], nav, ctx)
    } else {
        CommandOutcome::NotUnderstood
    };
    info!("command {input:?} -> {outcome:?}");
    outcome
}

fn handle_autopilot(
    verb: &str,
    target: BodyId,
    nav: &mut Navigator,
    ctx: &mut SimContext,
) -> CommandOutcome {
    match verb {
        "fly" | "go" => nav.fly_to(target, ctx),
        "look" => {
            if let Some(pos) = ctx.arena.get(target).map(|b| b.position()) {
                ctx.craft.look_at(pos, Vec3::Y);
                ctx.pose.transform.look_at(pos, Vec3::Y);
            }
        }
        "orbit" | "jump" => nav.enter_orbit(target, ctx),
        "track" => nav.set_track(target),
        "follow" => nav.set_follow(target, ctx),
        _ => return CommandOutcome::NotUnderstood,
    }
    nav.set_selected(Some(target));
    CommandOutcome::Completed
}

fn handle_imperative(cmd: &str, nav: &mut Navigator, ctx: &mut SimContext) -> CommandOutcome {
    match cmd {
        "picture" | "snapshot" => ctx.emit(HostEvent::TakeSnapshot),
        "clouds" | "atmosphere" => ctx.atmosphere_visible = !ctx.atmosphere_visible,
        "reset" => {
            ctx.emit(HostEvent::ResetTracking);
            let craft = ctx.craft;
            ctx.pose.recenter_on(&craft);
        }
        "zero" | "front" => {
            let craft = ctx.craft;
            ctx.pose.recenter_on(&craft);
        }
        "pause" => nav.pause(),
        "resume" => {
            if !nav.resume() {
                warn!("resume with no paused program");
                return CommandOutcome::NotPossible;
            }
        }
        "stop" => nav.stop(),
        "faster" => nav.trim_velocity(true),
        "slower" => nav.trim_velocity(false),
        "lock" => nav.set_attitude_locked(true),
        "unlock" => nav.set_attitude_locked(false),
        "mark" => ctx.pose.mark(),
        "set" => {
            let mark = ctx.pose.marked();
            ctx.craft.position = mark.position;
            ctx.craft.rotation = mark.rotation;
            ctx.pose.transform.position = mark.position;
            ctx.pose.transform.rotation = mark.rotation;
        }
        "credits" => ctx.emit(HostEvent::RunCredits),
        _ => return CommandOutcome::NotUnderstood,
    }
    CommandOutcome::Completed
}

fn handle_binary(
    verb: &str,
    object: &str,
    nav: &mut Navigator,
    ctx: &mut SimContext,
) -> CommandOutcome {
    let (multiplier, grow) = match (verb, object) {
        ("enter", "orbit") => {
            let Some(selected) = nav.selected() else {
                return CommandOutcome::NotPossible;
            };
            nav.enter_orbit(selected, ctx);
            return CommandOutcome::Completed;
        }
        ("exit" | "leave", "orbit") => {
            nav.exit_orbit(ctx);
            return CommandOutcome::Completed;
        }
        ("enter" | "exit" | "leave", _) => return CommandOutcome::NotUnderstood,
        // increase and decrease both ride the growth branch, and double
        // grows by its full multiplier (lands at 3x)
        ("faster" | "increase" | "decrease", _) => (0.05, true),
        ("double", _) => (2.0, true),
        ("slower", _) => (0.05, false),
        ("half" | "halve", _) => (0.5, false),
        _ => return CommandOutcome::NotUnderstood,
    };
    let apply = |v: f32| if grow { v + v * multiplier } else { v - v * multiplier };
    match object {
        "time" => ctx.time_base = apply(ctx.time_base),
        "speed" => nav.set_velocity(apply(nav.velocity())),
        "elevation" => nav.set_orbit_elevation(apply(nav.orbit_elevation())),
        _ => return CommandOutcome::NotUnderstood,
    }
    CommandOutcome::Completed
}

fn handle_set(
    object: &str,
    value: &str,
    nav: &mut Navigator,
    ctx: &mut SimContext,
) -> CommandOutcome {
    let Ok(v) = value.parse::<f32>() else {
        return CommandOutcome::NotPossible;
    };
    match object {
        "time" => ctx.time_base = v / 100.0,
        "speed" => nav.set_velocity(v),
        "elevation" => nav.set_orbit_elevation(v),
        "weather" | "climate" => ctx.atmosphere_spin = v,
        _ => return CommandOutcome::NotUnderstood,
    }
    CommandOutcome::Completed
}

/// Scan for bodies inside the craft's view cone, excluding the currently
/// selected one, and announce what is there. A single planet or moon also
/// becomes the selection.
fn whats_that(nav: &mut Navigator, ctx: &mut SimContext) {
    let craft_pos = ctx.craft.position;
    let forward = ctx.craft.forward();
    let visible: Vec<BodyId> = ctx
        .arena
        .iter()
        .filter(|body| {
            if nav.selected() == Some(body.id()) {
                return false;
            }
            let to_body = body.position() - craft_pos;
            if to_body.length_squared() <= f32::EPSILON {
                return false;
            }
            to_body.normalize().dot(forward) > VIEW_CONE_COS
        })
        .map(|body| body.id())
        .collect();

    match visible.as_slice() {
        [] => ctx.speak("I don't see anything"),
        [id] => {
            let id = *id;
            let Some(name) = ctx.arena.get(id).map(|b| b.name().to_string()) else {
                return;
            };
            if ctx.arena.is_planet(id) {
                ctx.speak(format!("That is the planet {name}"));
                nav.set_selected(Some(id));
            } else if ctx.arena.is_moon(id) {
                let parent = ctx
                    .arena
                    .get(id)
                    .and_then(|b| b.parent())
                    .and_then(|p| ctx.arena.get(p))
                    .map(|p| p.name().to_string())
                    .unwrap_or_default();
                ctx.speak(format!("That is the moon {name} of {parent}"));
                nav.set_selected(Some(id));
            }
            // the root body is neither and goes unannounced
        }
        many => {
            let planets = many.iter().filter(|id| ctx.arena.is_planet(**id)).count();
            let moons = many.len() - planets;
            ctx.speak(format!("{planets} planets and {moons} moons"));
        }
    }
}

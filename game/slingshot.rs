/* Copyright 2023 Torbjørn Birch Moltu
 *
 * This file is part of slingshot.
 * You can redistribute it and/or modify it under the terms of the
 * GNU General Public License as published by the Free Software Foundation,
 * either version 3 of the License, or (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <http://www.gnu.org/licenses/>.
 */

use ::interface::game::*;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

pub const NAME: &str = "Slingshot In Place";
pub const INITIAL_SIZE: [f32;2] = [CANVAS, CANVAS];

// Positions are in pixels of the square play area,
// speeds in pixels per tick.
pub const CANVAS: f32 = 512.0;
pub const TICK_RATE: u32 = 60;
pub const BALL_RADIUS: f32 = 8.0;
pub const TARGET_RADIUS: f32 = 12.0;
pub const LAUNCH_SCALE: f32 = 0.25;
pub const DECAY: f32 = 0.995; // per tick
pub const AIM_RADIUS: f32 = 10.0;
/// Distance from every edge to the target center.
pub const SPAWN_MARGIN: f32 = 80.0;
pub const BALL_START: [f32;2] = [80.0, 380.0];
pub const MAX_START_SPEED: i32 = 4; // per axis
/// Time beyond this many ticks per update is dropped.
const MAX_TICKS_PER_UPDATE: u32 = 8;
const TICK_SECONDS: f32 = 1.0 / TICK_RATE as f32;

const BACKGROUND_COLOR: &str = "cccccc";
const SCORE_COLOR: &str = "000000";
const SCORE_SIZE: f32 = 20.0;
const SCORE_POSITION: [f32;2] = [10.0, 8.0];
const TARGET_COLOR: &str = "ff0000";
const BALL_COLOR: &str = "000000";
const AIM_CIRCLE_COLOR: &str = "ffff00";
const AIM_LINE_COLOR: &str = "ff0000";
const AIM_LINE_WIDTH: f32 = 2.0;
const AIM_DASH: f32 = 6.0;

fn distance(a: [f32;2],  b: [f32;2]) -> f32 {
    (a[0]-b[0]).hypot(a[1]-b[1])
}

/// Converts pixels to the fractions `Graphics` expects.
fn frac(pixels: f32) -> f32 {
    pixels / CANVAS
}
fn frac_pos([x, y]: [f32;2]) -> [f32;2] {
    [frac(x), frac(y)]
}

/// Where the pointer grabbed the ball.
#[derive(Clone,Copy, Debug, PartialEq)]
struct Drag {
    anchor: [f32;2],
    /// anchor to ball, only for show
    radius: f32,
}

#[derive(Clone,Copy, Debug, PartialEq)]
enum Mode {Flying, Dragging(Drag)}

pub struct Slingshot {
    ball_pos: [f32;2],
    ball_vel: [f32;2],
    target_pos: [f32;2],
    score: u32,
    mode: Mode,
    /// last known pointer position, press and release don't have one.
    /// None until the pointer has moved over the window.
    pointer: Option<[f32;2]>,
    /// seconds not yet simulated
    unsimulated: f32,
    rng: StdRng,
}

impl Slingshot {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Same seed, same start velocity and targets.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(mut rng: StdRng) -> Self {
        let speed = MAX_START_SPEED;
        let ball_vel = loop {
            let vel = [rng.gen_range(-speed..=speed), rng.gen_range(-speed..=speed)];
            if vel != [0, 0] {
                break [vel[0] as f32, vel[1] as f32];
            }
        };
        let target_pos = random_target(&mut rng);
        Slingshot {
            ball_pos: BALL_START,
            ball_vel,
            target_pos,
            score: 0,
            mode: Mode::Flying,
            pointer: None,
            unsimulated: 0.0,
            rng,
        }
    }

    /// Replaces where the ball is and how fast it moves.
    pub fn with_ball(mut self,  pos: [f32;2],  vel: [f32;2]) -> Self {
        self.ball_pos = pos;
        self.ball_vel = vel;
        self
    }

    pub fn with_target(mut self,  pos: [f32;2]) -> Self {
        self.target_pos = pos;
        self
    }

    pub fn ball_position(&self) -> [f32;2] {
        self.ball_pos
    }
    pub fn ball_velocity(&self) -> [f32;2] {
        self.ball_vel
    }
    pub fn target_position(&self) -> [f32;2] {
        self.target_pos
    }
    pub fn score(&self) -> u32 {
        self.score
    }
    pub fn is_dragging(&self) -> bool {
        matches!(self.mode, Mode::Dragging(_))
    }
    pub fn anchor(&self) -> Option<[f32;2]> {
        match self.mode {
            Mode::Dragging(drag) => Some(drag.anchor),
            Mode::Flying => None,
        }
    }
    /// Distance from the anchor to the ball, while dragging.
    pub fn aim_radius(&self) -> Option<f32> {
        match self.mode {
            Mode::Dragging(drag) => Some(drag.radius),
            Mode::Flying => None,
        }
    }

    /// One fixed step: move the ball unless it's held, then look for a hit.
    pub fn tick(&mut self) {
        if self.mode == Mode::Flying {
            self.fly();
        }
        self.check_hit();
    }

    fn fly(&mut self) {
        let pos = &mut self.ball_pos;
        let vel = &mut self.ball_vel;
        for axis in 0..2 {
            pos[axis] += vel[axis];
            if pos[axis] < BALL_RADIUS {
                pos[axis] = BALL_RADIUS;
                vel[axis] = -vel[axis];
            } else if pos[axis] > CANVAS-BALL_RADIUS {
                pos[axis] = CANVAS-BALL_RADIUS;
                vel[axis] = -vel[axis];
            }
        }
        // also after bouncing
        vel[0] *= DECAY;
        vel[1] *= DECAY;
    }

    fn check_hit(&mut self) {
        if distance(self.ball_pos, self.target_pos) <= BALL_RADIUS+TARGET_RADIUS {
            self.score += 1;
            self.target_pos = random_target(&mut self.rng);
            log::debug!("hit, score is now {}, next target at {:?}", self.score, self.target_pos);
        }
    }

    /// Grabs the ball if `pos` is on it.
    pub fn press(&mut self,  pos: [f32;2]) {
        self.pointer = Some(pos);
        if distance(pos, self.ball_pos) <= BALL_RADIUS {
            self.mode = Mode::Dragging(Drag { anchor: pos, radius: 0.0 });
            self.ball_vel = [0.0, 0.0];
        }
    }

    /// Moves a grabbed ball to `pos`, even outside the play area.
    pub fn drag(&mut self,  pos: [f32;2]) {
        self.pointer = Some(pos);
        if let Mode::Dragging(ref mut drag) = self.mode {
            self.ball_pos = pos;
            drag.radius = distance(drag.anchor, pos);
        }
    }

    /// Lets go of the ball, which flies away from `pos` past the anchor.
    pub fn release(&mut self,  pos: [f32;2]) {
        self.pointer = Some(pos);
        if let Mode::Dragging(drag) = self.mode {
            self.ball_vel = [
                (drag.anchor[0]-pos[0]) * LAUNCH_SCALE,
                (drag.anchor[1]-pos[1]) * LAUNCH_SCALE,
            ];
            self.mode = Mode::Flying;
            log::debug!("launched from {:?} with velocity {:?}", pos, self.ball_vel);
        }
    }
}

impl Default for Slingshot {
    fn default() -> Self {
        Self::new()
    }
}

/// Somewhere the whole target is inside the play area, with room to spare.
fn random_target(rng: &mut StdRng) -> [f32;2] {
    let range = SPAWN_MARGIN..CANVAS-SPAWN_MARGIN;
    [rng.gen_range(range.clone()), rng.gen_range(range)]
}

impl Game for Slingshot {
    fn render(&self,  gfx: &mut Graphics) {
        gfx.rectangle(hex(BACKGROUND_COLOR), [0.0, 0.0, 1.0, 1.0]);
        gfx.text(
                hex(SCORE_COLOR),
                frac_pos(SCORE_POSITION),
                [Align::Left, Align::Left],
                frac(SCORE_SIZE),
                format!("Score: {}", self.score),
        );
        gfx.circle(hex(TARGET_COLOR), frac_pos(self.target_pos), frac(TARGET_RADIUS));
        gfx.circle(hex(BALL_COLOR), frac_pos(self.ball_pos), frac(BALL_RADIUS));

        if let Mode::Dragging(drag) = self.mode {
            // the circle marks where the ball was grabbed and doesn't grow
            gfx.dashed_circle(
                    hex(AIM_CIRCLE_COLOR),
                    frac_pos(drag.anchor),
                    frac(AIM_RADIUS),
                    frac(AIM_LINE_WIDTH/2.0),
                    frac(AIM_DASH),
            );
            let [x1, y1] = frac_pos(drag.anchor);
            let [x2, y2] = frac_pos(self.ball_pos);
            gfx.line(hex(AIM_LINE_COLOR), frac(AIM_LINE_WIDTH/2.0), [x1, y1, x2, y2]);
        }
    }

    fn update(&mut self,  dt: f32) {
        if !(dt > 0.0) {
            return;
        }
        self.unsimulated += dt;
        let mut ticks = 0;
        while self.unsimulated >= TICK_SECONDS {
            if ticks == MAX_TICKS_PER_UPDATE {
                log::debug!("skipping {:.3}s of simulation", self.unsimulated);
                self.unsimulated = 0.0;
                break;
            }
            self.tick();
            self.unsimulated -= TICK_SECONDS;
            ticks += 1;
        }
    }

    fn mouse_move(&mut self,  pos: [f32; 2]) {
        self.drag([pos[0]*CANVAS, pos[1]*CANVAS]);
    }

    fn mouse_press(&mut self,  button: MouseButton) {
        if let (MouseButton::Left, Some(pos)) = (button, self.pointer) {
            self.press(pos);
        }
    }

    fn mouse_release(&mut self,  button: MouseButton) {
        if let (MouseButton::Left, Some(pos)) = (button, self.pointer) {
            self.release(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn resting() -> Slingshot {
        Slingshot::with_seed(7)
            .with_ball([100.0, 100.0], [1.0, 0.0])
            .with_target([400.0, 400.0])
    }

    #[test]
    fn update_runs_whole_ticks() {
        let mut game = resting();
        game.update(TICK_SECONDS * 2.5);
        assert_abs_diff_eq!(game.ball_pos[0], 100.0 + 1.0 + DECAY, epsilon = 1e-4);
        assert_abs_diff_eq!(game.unsimulated, TICK_SECONDS * 0.5, epsilon = 1e-5);
    }

    #[test]
    fn update_keeps_remainder_for_next_time() {
        let mut game = resting();
        game.update(TICK_SECONDS * 0.6);
        assert_eq!(game.ball_pos, [100.0, 100.0]);
        game.update(TICK_SECONDS * 0.6);
        assert_abs_diff_eq!(game.ball_pos[0], 101.0, epsilon = 1e-4);
    }

    #[test]
    fn update_drops_backlog_after_stall() {
        let mut game = resting();
        game.update(1.0);
        let expected: f32 = (0..MAX_TICKS_PER_UPDATE).map(|n| DECAY.powi(n as i32)).sum();
        assert_abs_diff_eq!(game.ball_pos[0], 100.0 + expected, epsilon = 1e-3);
        assert_eq!(game.unsimulated, 0.0);
    }

    #[test]
    fn update_ignores_nonsense_dt() {
        let mut game = resting();
        game.update(-1.0);
        game.update(f32::NAN);
        assert_eq!(game.ball_pos, [100.0, 100.0]);
        assert_eq!(game.unsimulated, 0.0);
    }

    #[test]
    fn random_targets_stay_inside_margin() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let [x, y] = random_target(&mut rng);
            for c in [x, y] {
                assert!(c >= SPAWN_MARGIN && c < CANVAS-SPAWN_MARGIN, "{:?}", [x, y]);
                assert!(c - TARGET_RADIUS >= 0.0 && c + TARGET_RADIUS <= CANVAS);
            }
        }
    }

    #[test]
    fn drag_radius_follows_ball() {
        let mut game = resting();
        game.press([100.0, 100.0]);
        game.drag([103.0, 104.0]);
        match game.mode {
            Mode::Dragging(drag) => {
                assert_eq!(drag.anchor, [100.0, 100.0]);
                assert_abs_diff_eq!(drag.radius, 5.0, epsilon = 1e-6);
            }
            Mode::Flying => panic!("not dragging"),
        }
    }
}

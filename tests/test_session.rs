use starwave::audio::{AudioSink, SoundCue};
use starwave::entities::{Enemy, Projectile, Screen};
use starwave::input::InputState;
use starwave::session::{
    Session, INVINCIBILITY_WINDOW, MAX_ENEMIES, MIN_ENEMIES, STARTING_LIVES,
};

/// Records every cue the session plays, so tests can observe sounds
/// without an audio device.
#[derive(Default)]
struct CueLog(Vec<SoundCue>);

impl AudioSink for CueLog {
    fn play(&mut self, cue: SoundCue) {
        self.0.push(cue);
    }
}

fn idle() -> InputState {
    InputState::default()
}

fn firing() -> InputState {
    InputState {
        fire: true,
        ..InputState::default()
    }
}

fn new_session() -> Session {
    Session::new(Screen::default())
}

/// An enemy parked far from the player: zero speed, mid-screen, so it
/// never collides, descends, or leaves. Used to hold the live count at
/// or above the spawn threshold while a test controls one enemy.
fn parked_enemy() -> Enemy {
    Enemy::new(100.0, 600.0, 0.0)
}

fn park(session: &mut Session, count: usize) {
    session.enemies.clear();
    for _ in 0..count {
        session.enemies.push(parked_enemy());
    }
}

// ── Construction & wave spawning ─────────────────────────────────────────────

#[test]
fn new_session_initial_state() {
    let s = new_session();
    assert_eq!(s.lives, STARTING_LIVES);
    assert_eq!(s.score, 0);
    assert_eq!(s.level, 1);
    assert_eq!(s.destroyed_this_level, 0);
    assert_eq!(s.needed_for_level, 20);
    assert_eq!(s.invincibility_timer, 0.0);
    assert!(!s.game_over);
    assert!(s.projectiles.is_empty());
    // The constructor spawns a full wave
    assert_eq!(s.enemies.len(), MAX_ENEMIES);
}

#[test]
fn initial_wave_evenly_spaced_above_screen() {
    let s = new_session();
    let spacing = s.screen.width / (MAX_ENEMIES + 1) as f32;
    for (i, enemy) in s.enemies.iter().enumerate() {
        assert_eq!(enemy.x, (i + 1) as f32 * spacing - 25.0);
        assert_eq!(enemy.y, s.screen.height);
        assert!(!enemy.destroyed);
    }
}

#[test]
fn wave_triggered_exactly_below_min() {
    let mut s = new_session();
    let mut audio = CueLog::default();

    park(&mut s, MIN_ENEMIES);
    s.update(0.0, &idle(), &mut audio);
    assert_eq!(s.enemies.len(), MIN_ENEMIES); // at the band floor: no spawn

    park(&mut s, MIN_ENEMIES - 1);
    s.update(0.0, &idle(), &mut audio);
    assert_eq!(s.enemies.len(), MAX_ENEMIES); // below it: topped up to max
}

#[test]
fn wave_top_up_spacing_counts_only_missing_enemies() {
    let mut s = new_session();
    let mut audio = CueLog::default();
    park(&mut s, 6);

    s.update(0.0, &idle(), &mut audio);

    // to_add = 13 - 6 = 7, spacing = width / 8
    let spacing = s.screen.width / 8.0;
    for (i, enemy) in s.enemies[6..].iter().enumerate() {
        assert_eq!(enemy.x, (i + 1) as f32 * spacing - 25.0);
        assert_eq!(enemy.y, s.screen.height);
    }
}

#[test]
fn spawn_speed_follows_level_with_cap() {
    assert_eq!(Session::spawn_speed(1), 100.5);
    assert_eq!(Session::spawn_speed(100), 150.0);
    assert_eq!(Session::spawn_speed(600), 400.0);
    assert_eq!(Session::spawn_speed(1000), 400.0); // capped
}

#[test]
fn wave_spawned_at_current_level_speed() {
    let mut s = new_session();
    let mut audio = CueLog::default();
    s.level = 10;
    s.enemies.clear();

    s.update(0.0, &idle(), &mut audio);

    assert!(s.enemies.iter().all(|e| e.speed == 105.0));
}

// ── Player hits & invincibility ──────────────────────────────────────────────

#[test]
fn enemy_contact_costs_a_life_and_grants_invincibility() {
    let mut s = new_session();
    let mut audio = CueLog::default();
    park(&mut s, MIN_ENEMIES);
    s.enemies[0] = Enemy::new(s.player.x, s.player.y, 0.0);

    s.update(0.016, &idle(), &mut audio);

    assert_eq!(s.lives, STARTING_LIVES - 1);
    assert_eq!(s.invincibility_timer, INVINCIBILITY_WINDOW);
    assert!(s.enemies[0].destroyed);
    // Destroyed, not yet removed, and no score for dying
    assert_eq!(s.enemies.len(), MIN_ENEMIES);
    assert_eq!(s.score, 0);
    assert_eq!(audio.0, vec![SoundCue::PlayerHit]);
}

#[test]
fn invincibility_from_first_hit_shields_later_enemies_same_frame() {
    let mut s = new_session();
    let mut audio = CueLog::default();
    park(&mut s, MIN_ENEMIES);
    s.enemies[0] = Enemy::new(s.player.x, s.player.y, 0.0);
    s.enemies[1] = Enemy::new(s.player.x, s.player.y, 0.0);

    s.update(0.016, &idle(), &mut audio);

    assert_eq!(s.lives, STARTING_LIVES - 1);
    assert!(s.enemies[0].destroyed);
    assert!(!s.enemies[1].destroyed);
}

#[test]
fn invincibility_blocks_hits_on_following_frames() {
    let mut s = new_session();
    let mut audio = CueLog::default();
    park(&mut s, MIN_ENEMIES);
    s.enemies[0] = Enemy::new(s.player.x, s.player.y, 0.0);
    s.update(0.016, &idle(), &mut audio);

    // A fresh enemy overlaps while the window is still open
    s.enemies[1] = Enemy::new(s.player.x, s.player.y, 0.0);
    for _ in 0..10 {
        s.update(0.016, &idle(), &mut audio);
    }

    assert_eq!(s.lives, STARTING_LIVES - 1);
    assert!(!s.enemies[1].destroyed);
}

// ── Game over ─────────────────────────────────────────────────────────────────

#[test]
fn last_life_sets_game_over_and_freezes_everything() {
    let mut s = new_session();
    let mut audio = CueLog::default();
    park(&mut s, MIN_ENEMIES);
    s.lives = 1;
    s.enemies[0] = Enemy::new(s.player.x, s.player.y, 0.0);

    s.update(0.016, &idle(), &mut audio);
    assert!(s.game_over);
    assert_eq!(s.lives, 0);

    let score = s.score;
    let level = s.level;
    let player_x = s.player.x;
    let enemy_positions: Vec<f32> = s.enemies.iter().map(|e| e.y).collect();
    let cue_count = audio.0.len();

    // Terminal state: further updates change nothing, even with fire held
    for _ in 0..5 {
        s.update(1.0, &firing(), &mut audio);
    }
    assert!(s.game_over);
    assert_eq!(s.lives, 0);
    assert_eq!(s.score, score);
    assert_eq!(s.level, level);
    assert_eq!(s.player.x, player_x);
    assert_eq!(
        s.enemies.iter().map(|e| e.y).collect::<Vec<f32>>(),
        enemy_positions
    );
    assert!(s.projectiles.is_empty());
    assert_eq!(audio.0.len(), cue_count);
}

// ── Enemy lifecycle ───────────────────────────────────────────────────────────

#[test]
fn off_screen_enemy_removed_without_score() {
    let mut s = new_session();
    let mut audio = CueLog::default();
    park(&mut s, MIN_ENEMIES);
    // One step of 100 px/s over 0.016 s pushes the top edge below y = 0
    s.enemies[0] = Enemy::new(300.0, -38.5, 100.0);

    s.update(0.016, &idle(), &mut audio);

    assert_eq!(s.enemies.len(), MIN_ENEMIES - 1);
    assert_eq!(s.score, 0);
    assert_eq!(s.destroyed_this_level, 0);
}

#[test]
fn explosion_removes_enemy_only_after_full_second() {
    let mut s = new_session();
    let mut audio = CueLog::default();
    park(&mut s, MIN_ENEMIES + 1);
    s.enemies[0].destroy();

    s.update(0.5, &idle(), &mut audio);
    assert_eq!(s.enemies.len(), MIN_ENEMIES + 1); // 0.5 s elapsed

    s.update(0.5, &idle(), &mut audio);
    // Exactly 1.0 s: threshold is strict, still present
    assert_eq!(s.enemies.len(), MIN_ENEMIES + 1);

    s.update(0.1, &idle(), &mut audio);
    assert_eq!(s.enemies.len(), MIN_ENEMIES);
    assert_eq!(s.score, 1); // level 1 at removal time
    assert_eq!(s.destroyed_this_level, 1);
}

#[test]
fn level_up_on_threshold_kill() {
    let mut s = new_session();
    let mut audio = CueLog::default();
    park(&mut s, MIN_ENEMIES + 1);
    s.destroyed_this_level = 19;
    s.enemies[0].destroy();
    s.enemies[0].explosion_elapsed = 0.95;

    s.update(0.1, &idle(), &mut audio);

    assert_eq!(s.level, 2);
    assert_eq!(s.needed_for_level, 23);
    assert_eq!(s.destroyed_this_level, 0);
    assert_eq!(s.score, 1); // scored at the pre-increment level
}

// ── Firing & projectile collisions ───────────────────────────────────────────

#[test]
fn holding_fire_spawns_one_projectile_per_frame() {
    let mut s = new_session();
    let mut audio = CueLog::default();

    for _ in 0..3 {
        s.update(0.016, &firing(), &mut audio);
    }

    assert_eq!(s.projectiles.len(), 3);
    let fire_cues = audio.0.iter().filter(|c| **c == SoundCue::Fire).count();
    assert_eq!(fire_cues, 3);
    // Newest projectile sits at the nose offset; earlier ones have risen
    let newest = s.projectiles.last().unwrap();
    assert_eq!(newest.x, s.player.x + 20.0);
    assert_eq!(newest.y, s.player.y + 40.0);
    assert!(s.projectiles[0].y > newest.y);
}

#[test]
fn projectile_hits_first_overlapping_enemy_only() {
    let mut s = new_session();
    let mut audio = CueLog::default();
    park(&mut s, MIN_ENEMIES);
    s.enemies[0] = Enemy::new(300.0, 400.0, 0.0);
    s.enemies[1] = Enemy::new(300.0, 400.0, 0.0);
    s.projectiles.push(Projectile::new(310.0, 395.0));

    s.update(0.0, &idle(), &mut audio);

    assert!(s.enemies[0].destroyed);
    assert!(!s.enemies[1].destroyed);
    assert!(!s.projectiles[0].active);
    assert_eq!(audio.0, vec![SoundCue::Explosion]);
}

#[test]
fn inactive_projectile_dropped_on_next_frame() {
    let mut s = new_session();
    let mut audio = CueLog::default();
    park(&mut s, MIN_ENEMIES);
    s.enemies[0] = Enemy::new(300.0, 400.0, 0.0);
    s.projectiles.push(Projectile::new(310.0, 395.0));

    s.update(0.0, &idle(), &mut audio);
    assert_eq!(s.projectiles.len(), 1); // spent, filtered next frame

    s.update(0.0, &idle(), &mut audio);
    assert!(s.projectiles.is_empty());
}

#[test]
fn two_projectiles_may_hit_the_same_enemy() {
    // The scan does not deduplicate across projectiles: both spend
    // themselves on one enemy and its explosion timer restarts.
    let mut s = new_session();
    let mut audio = CueLog::default();
    park(&mut s, MIN_ENEMIES);
    s.enemies[0] = Enemy::new(300.0, 400.0, 0.0);
    s.projectiles.push(Projectile::new(310.0, 395.0));
    s.projectiles.push(Projectile::new(320.0, 405.0));

    s.update(0.0, &idle(), &mut audio);

    assert!(s.enemies[0].destroyed);
    assert_eq!(s.enemies[0].explosion_elapsed, 0.0);
    assert!(s.projectiles.iter().all(|p| !p.active));
    let explosions = audio.0.iter().filter(|c| **c == SoundCue::Explosion).count();
    assert_eq!(explosions, 2);
}

// ── Session-wide monotonicity ────────────────────────────────────────────────

#[test]
fn lives_never_increase_and_score_never_decreases() {
    let mut s = new_session();
    let mut audio = CueLog::default();
    let mut prev_lives = s.lives;
    let mut prev_score = s.score;
    let mut seen_game_over = false;

    for _ in 0..300 {
        s.update(0.033, &firing(), &mut audio);
        assert!(s.lives <= prev_lives);
        assert!(s.score >= prev_score);
        if seen_game_over {
            assert!(s.game_over); // terminal flag is monotonic
        }
        seen_game_over = s.game_over;
        prev_lives = s.lives;
        prev_score = s.score;
    }
}

#[test]
fn enemy_count_never_exceeds_max_after_spawn() {
    let mut s = new_session();
    let mut audio = CueLog::default();
    for _ in 0..200 {
        s.update(0.033, &idle(), &mut audio);
        assert!(s.enemies.len() <= MAX_ENEMIES);
    }
}

//! Integration tests driving the quality-switch controller against the
//! mock host player.

use std::sync::Arc;
use std::time::Duration;

use crest_core::{
    PlaybackSurface, QualityChoice, QualityMenu, QualitySelector, Rendition, RenditionRegistry,
    SelectorConfig, SwitchTuning,
};
use crest_sim::{MockMenu, MockPlayer, MockRenditionRegistry, PlayerCall};

fn hls_renditions() -> Vec<Rendition> {
    vec![
        Rendition::new(1280, 720),
        Rendition::new(854, 480),
        Rendition::new(1280, 720),
    ]
}

async fn attach(
    player: &Arc<MockPlayer>,
    registry: &Arc<MockRenditionRegistry>,
    menu: &Arc<MockMenu>,
    config: SelectorConfig,
) -> QualitySelector {
    let _ = crest_core::tracing_setup::init_tracing(tracing::Level::WARN);
    QualitySelector::attach(
        Arc::clone(player) as Arc<dyn PlaybackSurface>,
        Some(Arc::clone(registry) as Arc<dyn RenditionRegistry>),
        Arc::clone(menu) as Arc<dyn QualityMenu>,
        config,
    )
    .await
    .expect("registry present, selector must attach")
}

/// Long enough to outlast `SwitchTuning::for_testing`'s restore delay.
async fn wait_for_restore() {
    tokio::time::sleep(Duration::from_millis(40)).await;
}

#[tokio::test]
async fn test_catalog_orders_auto_first_then_descending() {
    let player = Arc::new(MockPlayer::new());
    let registry = Arc::new(MockRenditionRegistry::new(hls_renditions()));
    let menu = Arc::new(MockMenu::new());

    attach(&player, &registry, &menu, SelectorConfig::for_testing()).await;

    let catalog = menu.last_rendered().expect("attach renders the catalog");
    let labels: Vec<&str> = catalog.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["Auto", "720p", "480p"]);
    assert!(catalog[0].selected, "auto starts selected");
}

#[tokio::test]
async fn test_incremental_discovery_rebuilds_catalog() {
    let player = Arc::new(MockPlayer::new());
    let registry = Arc::new(MockRenditionRegistry::new(vec![Rendition::new(1280, 720)]));
    let menu = Arc::new(MockMenu::new());

    let selector = attach(&player, &registry, &menu, SelectorConfig::for_testing()).await;

    registry.push(Rendition::new(854, 480));
    selector.on_rendition_added().await;

    let catalog = menu.last_rendered().unwrap();
    let labels: Vec<&str> = catalog.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["Auto", "720p", "480p"]);
    assert_eq!(menu.rendered().len(), 2);
}

#[tokio::test]
async fn test_fixed_tier_enables_only_matching_renditions() {
    let player = Arc::new(MockPlayer::new());
    let registry = Arc::new(MockRenditionRegistry::new(hls_renditions()));
    let menu = Arc::new(MockMenu::new());

    let selector = attach(&player, &registry, &menu, SelectorConfig::for_testing()).await;
    selector.set_quality(QualityChoice::Tier(480)).await;
    wait_for_restore().await;

    assert_eq!(registry.enabled_flags(), vec![false, true, false]);
    assert_eq!(selector.current_quality(), QualityChoice::Tier(480));

    let catalog = menu.last_rendered().unwrap();
    let selected: Vec<_> = catalog.iter().filter(|e| e.selected).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].value, QualityChoice::Tier(480));
}

#[tokio::test]
async fn test_auto_selection_is_idempotent() {
    let player = Arc::new(MockPlayer::new());
    let registry = Arc::new(MockRenditionRegistry::new(hls_renditions()));
    let menu = Arc::new(MockMenu::new());

    let selector = attach(&player, &registry, &menu, SelectorConfig::for_testing()).await;

    selector.set_quality(QualityChoice::Auto).await;
    wait_for_restore().await;
    assert_eq!(selector.current_quality(), QualityChoice::Auto);
    assert_eq!(registry.enabled_flags(), vec![true, true, true]);

    selector.set_quality(QualityChoice::Auto).await;
    wait_for_restore().await;
    assert_eq!(selector.current_quality(), QualityChoice::Auto);
    assert_eq!(registry.enabled_flags(), vec![true, true, true]);
}

#[tokio::test]
async fn test_unmatched_tier_commits_state_without_flush() {
    let player = Arc::new(MockPlayer::new());
    let registry = Arc::new(MockRenditionRegistry::new(hls_renditions()));
    let menu = Arc::new(MockMenu::new());

    let selector = attach(&player, &registry, &menu, SelectorConfig::for_testing()).await;
    selector.set_quality(QualityChoice::Tier(999)).await;
    wait_for_restore().await;

    // State commits even though nothing matched.
    assert_eq!(selector.current_quality(), QualityChoice::Tier(999));
    assert_eq!(registry.enabled_flags(), vec![false, false, false]);

    // No choreography: never paused, never sought, never restored.
    assert!(player.calls().is_empty());
    // The button affordance is still reset.
    assert_eq!(menu.unpress_count(), 1);
}

#[tokio::test]
async fn test_restore_fidelity_after_switch() {
    let player = Arc::new(
        MockPlayer::builder()
            .current_time(10.0)
            .volume(0.8)
            .build(),
    );
    let registry = Arc::new(MockRenditionRegistry::new(hls_renditions()));
    let menu = Arc::new(MockMenu::new());

    let selector = attach(&player, &registry, &menu, SelectorConfig::for_testing()).await;
    selector.set_quality(QualityChoice::Tier(480)).await;

    // Flush happened: paused and buffer cleared, not yet restored.
    assert_eq!(player.call_count(&PlayerCall::Pause), 1);
    assert_eq!(player.call_count(&PlayerCall::ClearBuffer), 1);

    wait_for_restore().await;

    assert_eq!(player.current_time().await, 10.0);
    assert_eq!(player.volume().await, 0.8);
    assert!(!player.is_paused().await, "playback resumed");
    assert_eq!(player.call_count(&PlayerCall::Play), 1);
}

#[tokio::test]
async fn test_paused_player_stays_paused_after_restore() {
    let player = Arc::new(MockPlayer::builder().current_time(3.0).paused().build());
    let registry = Arc::new(MockRenditionRegistry::new(hls_renditions()));
    let menu = Arc::new(MockMenu::new());

    let selector = attach(&player, &registry, &menu, SelectorConfig::for_testing()).await;
    selector.set_quality(QualityChoice::Tier(720)).await;
    wait_for_restore().await;

    assert!(player.is_paused().await);
    assert_eq!(player.call_count(&PlayerCall::Play), 0);
    assert_eq!(player.current_time().await, 3.0);
}

#[tokio::test]
async fn test_seek_nudge_fallback_without_clear_buffer() {
    let player = Arc::new(
        MockPlayer::builder()
            .current_time(5.0)
            .without_clear_buffer()
            .build(),
    );
    let registry = Arc::new(MockRenditionRegistry::new(hls_renditions()));
    let menu = Arc::new(MockMenu::new());

    let selector = attach(&player, &registry, &menu, SelectorConfig::for_testing()).await;
    selector.set_quality(QualityChoice::Tier(480)).await;

    let calls = player.calls();
    assert_eq!(calls[0], PlayerCall::Pause);
    assert!(matches!(calls[1], PlayerCall::Seek(p) if (p - 4.9).abs() < 1e-9));

    wait_for_restore().await;
    assert_eq!(player.current_time().await, 5.0);
}

#[tokio::test]
async fn test_seek_nudge_floors_at_zero() {
    let player = Arc::new(
        MockPlayer::builder()
            .current_time(0.05)
            .without_clear_buffer()
            .build(),
    );
    let registry = Arc::new(MockRenditionRegistry::new(hls_renditions()));
    let menu = Arc::new(MockMenu::new());

    let selector = attach(&player, &registry, &menu, SelectorConfig::for_testing()).await;
    selector.set_quality(QualityChoice::Tier(480)).await;

    assert!(player.calls().contains(&PlayerCall::Seek(0.0)));
}

#[tokio::test]
async fn test_newer_switch_supersedes_pending_restore() {
    let player = Arc::new(
        MockPlayer::builder()
            .current_time(10.0)
            .volume(0.8)
            .build(),
    );
    let registry = Arc::new(MockRenditionRegistry::new(hls_renditions()));
    let menu = Arc::new(MockMenu::new());

    let config = SelectorConfig {
        switch: SwitchTuning {
            restore_delay: Duration::from_millis(30),
            ..SwitchTuning::default()
        },
        ..SelectorConfig::default()
    };
    let selector = attach(&player, &registry, &menu, config).await;

    selector.set_quality(QualityChoice::Tier(480)).await;
    selector.set_quality(QualityChoice::Tier(720)).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    // Only the second switch's restore fired; the first was aborted.
    assert_eq!(player.volume_set_count(), 1);
    assert_eq!(selector.current_quality(), QualityChoice::Tier(720));
    assert_eq!(registry.enabled_flags(), vec![true, false, true]);
}

#[tokio::test]
async fn test_rapid_switches_resume_playback() {
    let player = Arc::new(
        MockPlayer::builder()
            .current_time(10.0)
            .volume(0.8)
            .build(),
    );
    let registry = Arc::new(MockRenditionRegistry::new(hls_renditions()));
    let menu = Arc::new(MockMenu::new());

    let config = SelectorConfig {
        switch: SwitchTuning {
            restore_delay: Duration::from_millis(30),
            ..SwitchTuning::default()
        },
        ..SelectorConfig::default()
    };
    let selector = attach(&player, &registry, &menu, config).await;

    // The second switch lands while the first restore is still pending and
    // the player is paused by the first flush; the original playing state
    // must carry over to the surviving restore.
    selector.set_quality(QualityChoice::Tier(480)).await;
    selector.set_quality(QualityChoice::Tier(720)).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(!player.is_paused().await, "playback resumed after rapid switches");
    assert_eq!(player.current_time().await, 10.0);
    assert_eq!(player.volume().await, 0.8);
    assert_eq!(player.call_count(&PlayerCall::Play), 1);
}

#[tokio::test]
async fn test_rapid_switches_keep_position_on_fallback() {
    let player = Arc::new(
        MockPlayer::builder()
            .current_time(10.0)
            .without_clear_buffer()
            .build(),
    );
    let registry = Arc::new(MockRenditionRegistry::new(hls_renditions()));
    let menu = Arc::new(MockMenu::new());

    let config = SelectorConfig {
        switch: SwitchTuning {
            restore_delay: Duration::from_millis(30),
            ..SwitchTuning::default()
        },
        ..SelectorConfig::default()
    };
    let selector = attach(&player, &registry, &menu, config).await;

    // The second snapshot must not read the position the first switch
    // already nudged backward; the restore lands on the original 10.0.
    selector.set_quality(QualityChoice::Tier(480)).await;
    selector.set_quality(QualityChoice::Tier(720)).await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(player.current_time().await, 10.0);
    assert!(!player.is_paused().await);
}

#[tokio::test]
async fn test_switch_after_completed_restore_snapshots_fresh_state() {
    let player = Arc::new(
        MockPlayer::builder()
            .current_time(10.0)
            .volume(0.8)
            .build(),
    );
    let registry = Arc::new(MockRenditionRegistry::new(hls_renditions()));
    let menu = Arc::new(MockMenu::new());

    let selector = attach(&player, &registry, &menu, SelectorConfig::for_testing()).await;

    selector.set_quality(QualityChoice::Tier(480)).await;
    wait_for_restore().await;

    // The earlier restore has long fired; a later switch must snapshot the
    // player as it is now, not inherit the stale snapshot.
    player.force_time(42.0);
    player.force_volume(0.5);
    selector.set_quality(QualityChoice::Tier(720)).await;
    wait_for_restore().await;

    assert_eq!(player.current_time().await, 42.0);
    assert_eq!(player.volume().await, 0.5);
    assert!(!player.is_paused().await);
}

#[tokio::test]
async fn test_selector_disabled_without_rendition_capability() {
    let player = Arc::new(MockPlayer::new());
    let menu = Arc::new(MockMenu::new());

    let selector = QualitySelector::attach(
        Arc::clone(&player) as Arc<dyn PlaybackSurface>,
        None,
        Arc::clone(&menu) as Arc<dyn QualityMenu>,
        SelectorConfig::for_testing(),
    )
    .await;

    assert!(selector.is_none());
    assert!(menu.rendered().is_empty());
    assert!(menu.placements().is_empty());
}

#[tokio::test]
async fn test_registration_reports_version_and_config() {
    let player = Arc::new(MockPlayer::new());
    let registry = Arc::new(MockRenditionRegistry::new(hls_renditions()));
    let menu = Arc::new(MockMenu::new());

    let mut config = SelectorConfig::for_testing();
    config.display_current_quality = true;
    let selector = attach(&player, &registry, &menu, config).await;

    let registration = selector.registration();
    assert_eq!(registration.version, env!("CARGO_PKG_VERSION"));
    assert!(registration.display_current_quality);
}

#[tokio::test]
async fn test_button_text_tracks_current_quality() {
    let player = Arc::new(MockPlayer::new());
    let registry = Arc::new(MockRenditionRegistry::new(hls_renditions()));
    let menu = Arc::new(MockMenu::new());

    let mut config = SelectorConfig::for_testing();
    config.display_current_quality = true;
    let selector = attach(&player, &registry, &menu, config).await;

    assert_eq!(menu.button_text().as_deref(), Some("Auto"));

    selector.set_quality(QualityChoice::Tier(480)).await;
    wait_for_restore().await;
    assert_eq!(menu.button_text().as_deref(), Some("480p"));

    selector.set_quality(QualityChoice::Auto).await;
    wait_for_restore().await;
    assert_eq!(menu.button_text().as_deref(), Some("Auto"));
}

#[tokio::test]
async fn test_menu_placement_forwarded_on_install() {
    let player = Arc::new(MockPlayer::new());
    let registry = Arc::new(MockRenditionRegistry::new(hls_renditions()));
    let menu = Arc::new(MockMenu::new());

    let mut config = SelectorConfig::for_testing();
    config.icon_class = Some("icon-hd".to_string());
    config.placement_index = Some(3);
    attach(&player, &registry, &menu, config).await;

    let placements = menu.placements();
    assert_eq!(placements.len(), 1);
    assert_eq!(placements[0].icon_class.as_deref(), Some("icon-hd"));
    assert_eq!(placements[0].placement_index, Some(3));
}

#[tokio::test]
async fn test_menu_failure_never_blocks_a_switch() {
    let player = Arc::new(MockPlayer::new());
    let registry = Arc::new(MockRenditionRegistry::new(hls_renditions()));
    let menu = Arc::new(MockMenu::failing());

    let selector = attach(&player, &registry, &menu, SelectorConfig::for_testing()).await;
    selector.set_quality(QualityChoice::Tier(480)).await;
    wait_for_restore().await;

    assert_eq!(selector.current_quality(), QualityChoice::Tier(480));
    assert_eq!(registry.enabled_flags(), vec![false, true, false]);
}

#[tokio::test]
async fn test_empty_rendition_list_is_a_silent_noop() {
    let player = Arc::new(MockPlayer::new());
    let registry = Arc::new(MockRenditionRegistry::empty());
    let menu = Arc::new(MockMenu::new());

    let selector = attach(&player, &registry, &menu, SelectorConfig::for_testing()).await;
    selector.set_quality(QualityChoice::Auto).await;
    wait_for_restore().await;

    // Nothing matched, so no choreography; the state still commits.
    assert_eq!(selector.current_quality(), QualityChoice::Auto);
    assert!(player.calls().is_empty());
}

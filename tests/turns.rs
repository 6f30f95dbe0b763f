mod common;

use common::*;
use roadrace::board::{GameBounds, GameMap, InfrastructureSites, RoadIndex};
use roadrace::cards::{BoundaryCard, ChanceEffect, GameCard, MotorwayCard};
use roadrace::coords::GridKey;
use roadrace::game::{
    ActionPayload, GameAction, GameError, GameEvent, GameStatus, TurnPhase,
};
use roadrace::types::{
    ActionType, Compass, DeckType, Infrastructure, Ordinal, RoadClass, Rotation, TokenColor,
};

fn roll(player: usize, d1: u8, d2: u8) -> GameAction {
    GameAction::new(player, ActionType::Roll).with_payload(ActionPayload::Dice(d1, d2))
}

fn choose(player: usize, cell: GridKey) -> GameAction {
    GameAction::new(player, ActionType::ChooseDestination).with_payload(ActionPayload::Cell(cell))
}

fn end(player: usize) -> GameAction {
    GameAction::new(player, ActionType::EndTurn)
}

fn obstruct(player: usize, cell: GridKey) -> GameAction {
    GameAction::new(player, ActionType::PlaceObstruction).with_payload(ActionPayload::Obstruction {
        cell,
        color: TokenColor::Red,
    })
}

/// A short street east from the center with a motorway cell diagonally off
/// its second step, and a spur road north of it starting at a junction.
fn motorway_map() -> GameMap {
    let bounds = GameBounds::new(GridKey::new(0, 0), GridKey::new(2_000, 2_000));
    let mut roads = RoadIndex::new(bounds);
    for de in 0..=3 {
        roads.insert_road(CENTER.offset(de, 0), RoadClass::B);
    }
    roads.insert_road(GridKey::new(1_200, 1_500), RoadClass::B);
    roads.insert_road(GridKey::new(1_200, 1_600), RoadClass::B);
    roads.insert_infrastructure(GridKey::new(1_300, 1_100), Infrastructure::Motorway);
    let sites = InfrastructureSites {
        junctions: vec![GridKey::new(1_200, 1_500)],
        stations: Vec::new(),
    };
    GameMap::new(bounds, roads, sites, CENTER, Vec::new()).unwrap()
}

fn motorway_card(infrastructure: Infrastructure) -> GameCard {
    GameCard::Motorway(MotorwayCard {
        direction: Compass::North,
        ordinal: Ordinal::First,
        infrastructure,
    })
}

#[test]
fn only_exact_roll_distances_are_legal() {
    let mut game = human_game(cross_map(&[]), 2);
    game.execute(roll(0, 3, 4)).unwrap();

    let options = game.state.legal_destinations();
    assert!(options.guided);
    let expected = [
        GridKey::new(300, 1_000),
        GridKey::new(1_700, 1_000),
        GridKey::new(1_000, 300),
        GridKey::new(1_000, 1_700),
    ];
    assert_eq!(options.cells.len(), 4);
    assert!(expected.iter().all(|c| options.contains(*c)));

    let err = game.execute(choose(0, GridKey::new(1_000, 1_300))).unwrap_err();
    assert!(matches!(err, GameError::IllegalDestination(_)));
    assert_eq!(game.state.phase, TurnPhase::DiceRolled);
    assert_eq!(game.state.players[0].position, CENTER);

    let outcome = game.execute(choose(0, GridKey::new(1_000, 1_700))).unwrap();
    let path = outcome
        .events
        .iter()
        .find_map(|e| match e {
            GameEvent::Moved { path, .. } => Some(path.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(path.len(), 8);
    assert_eq!(path.first(), Some(&CENTER));
    assert_eq!(game.state.players[0].position, GridKey::new(1_000, 1_700));
    assert_eq!(game.state.phase, TurnPhase::EndTurn);
}

#[test]
fn phases_are_enforced() {
    let mut game = human_game(cross_map(&[]), 2);
    let err = game.execute(choose(0, GridKey::new(1_000, 1_300))).unwrap_err();
    assert!(matches!(
        err,
        GameError::InvalidPhase {
            phase: TurnPhase::RollDice,
            ..
        }
    ));
    assert!(game.execute(end(0)).is_err());

    game.execute(roll(0, 1, 2)).unwrap();
    assert!(matches!(
        game.execute(roll(0, 1, 2)),
        Err(GameError::InvalidPhase { .. })
    ));
    assert!(matches!(
        game.execute(end(0)),
        Err(GameError::InvalidPhase { .. })
    ));
    assert_eq!(game.state.actions.len(), 1);
}

#[test]
fn fixed_dice_outside_one_to_six_are_rejected() {
    let mut game = human_game(cross_map(&[]), 2);
    let before = serde_json::to_value(game.state.snapshot()).unwrap();
    for (d1, d2) in [(0, 9), (0, 3), (4, 7)] {
        assert!(matches!(
            game.execute(roll(0, d1, d2)),
            Err(GameError::InvalidPayload(_))
        ));
    }
    assert_eq!(serde_json::to_value(game.state.snapshot()).unwrap(), before);
    assert_eq!(game.state.last_roll, None);
    assert_eq!(game.state.phase, TurnPhase::RollDice);
    assert!(game.state.actions.is_empty());

    game.execute(roll(0, 6, 1)).unwrap();
    assert_eq!(game.state.last_roll, Some((6, 1)));
}

#[test]
fn actions_out_of_turn_change_nothing() {
    let mut game = human_game(cross_map(&[]), 2);
    let before = serde_json::to_value(game.state.snapshot()).unwrap();
    let err = game.execute(roll(1, 1, 2)).unwrap_err();
    assert!(matches!(
        err,
        GameError::ActionOutOfTurn {
            expected: 0,
            actual: 1
        }
    ));
    assert!(matches!(game.execute(roll(5, 1, 2)), Err(GameError::InvalidPlayer(5))));
    assert_eq!(serde_json::to_value(game.state.snapshot()).unwrap(), before);
    assert!(game.state.actions.is_empty());
}

#[test]
fn boundary_crossing_relocates_and_spends_remaining_moves() {
    let mut game = human_game(hook_map(), 2);
    let card = GameCard::Boundary(BoundaryCard {
        road_class: RoadClass::B,
        ordinal: Ordinal::First,
        rotation: Rotation::Clockwise,
    });
    let id = card_id(DeckType::Boundary, &card);
    stack_decks(&mut game, &[(DeckType::Boundary, id)]);

    game.execute(roll(0, 3, 4)).unwrap();
    assert_eq!(
        game.state.legal_destinations().cells.into_iter().collect::<Vec<_>>(),
        vec![GridKey::new(1_000, 700)]
    );
    let outcome = game.execute(choose(0, GridKey::new(1_000, 700))).unwrap();

    let drawn = outcome.events.iter().find_map(|e| match e {
        GameEvent::CardDrawn { card, .. } => Some(card.clone()),
        _ => None,
    });
    assert_eq!(drawn.map(|d| (d.deck, d.id)), Some((DeckType::Boundary, id)));
    assert!(outcome.events.iter().any(|e| matches!(
        e,
        GameEvent::Relocated { from, to, .. }
            if *from == GridKey::new(1_000, 500) && *to == GridKey::new(0, 500)
    )));
    // Five steps to the east edge, relocation, then the two remaining steps.
    assert_eq!(game.state.players[0].position, GridKey::new(200, 500));
    assert_eq!(
        game.state.last_path,
        vec![
            GridKey::new(500, 500),
            GridKey::new(600, 500),
            GridKey::new(700, 500),
            GridKey::new(800, 500),
            GridKey::new(900, 500),
            GridKey::new(1_000, 500),
            GridKey::new(0, 500),
            GridKey::new(100, 500),
            GridKey::new(200, 500),
        ]
    );
    assert!(game.state.decks.pending().is_empty());
}

#[test]
fn motorway_proximity_relocates_to_a_junction() {
    let mut game = human_game(motorway_map(), 2);
    let id = card_id(DeckType::Motorway, &motorway_card(Infrastructure::Motorway));
    stack_decks(&mut game, &[(DeckType::Motorway, id)]);

    game.execute(roll(0, 1, 2)).unwrap();
    let destination = GridKey::new(1_300, 1_000);
    assert_eq!(
        game.state.legal_destinations().cells.into_iter().collect::<Vec<_>>(),
        vec![destination]
    );
    let outcome = game.execute(choose(0, destination)).unwrap();

    let drawn = outcome.events.iter().find_map(|e| match e {
        GameEvent::CardDrawn { card, .. } => Some(card.clone()),
        _ => None,
    });
    assert_eq!(drawn.map(|d| (d.deck, d.id)), Some((DeckType::Motorway, id)));
    assert!(outcome.events.iter().any(|e| matches!(
        e,
        GameEvent::Relocated { from, to, .. }
            if *from == GridKey::new(1_200, 1_000) && *to == GridKey::new(1_200, 1_500)
    )));
    // Two steps to the motorway, relocation, then the one remaining step.
    assert_eq!(
        game.state.last_path,
        vec![
            CENTER,
            GridKey::new(1_100, 1_000),
            GridKey::new(1_200, 1_000),
            GridKey::new(1_200, 1_500),
            GridKey::new(1_200, 1_600),
        ]
    );
    assert_eq!(game.state.players[0].position, GridKey::new(1_200, 1_600));
    assert!(game.state.decks.pending().is_empty());
}

#[test]
fn railway_card_without_stations_completes_the_original_move() {
    let mut game = human_game(motorway_map(), 2);
    let id = card_id(DeckType::Motorway, &motorway_card(Infrastructure::Railway));
    stack_decks(&mut game, &[(DeckType::Motorway, id)]);

    game.execute(roll(0, 1, 2)).unwrap();
    let outcome = game.execute(choose(0, GridKey::new(1_300, 1_000))).unwrap();
    assert!(outcome.events.iter().any(|e| matches!(
        e,
        GameEvent::CardUnresolved {
            deck: DeckType::Motorway,
            ..
        }
    )));
    assert!(!outcome.events.iter().any(|e| matches!(e, GameEvent::Relocated { .. })));
    assert_eq!(game.state.players[0].position, GridKey::new(1_300, 1_000));
    assert_eq!(game.state.last_path.len(), 4);
}

#[test]
fn unresolvable_card_completes_the_original_move() {
    let mut game = human_game(hook_map(), 2);
    let card = GameCard::Boundary(BoundaryCard {
        road_class: RoadClass::A,
        ordinal: Ordinal::First,
        rotation: Rotation::Clockwise,
    });
    stack_decks(&mut game, &[(DeckType::Boundary, card_id(DeckType::Boundary, &card))]);

    game.execute(roll(0, 3, 4)).unwrap();
    let outcome = game.execute(choose(0, GridKey::new(1_000, 700))).unwrap();
    assert!(outcome.events.iter().any(|e| matches!(
        e,
        GameEvent::CardUnresolved {
            deck: DeckType::Boundary,
            ..
        }
    )));
    assert!(!outcome.events.iter().any(|e| matches!(e, GameEvent::Relocated { .. })));
    assert_eq!(game.state.players[0].position, GridKey::new(1_000, 700));
}

#[test]
fn doubles_draw_a_chance_card_before_moving() {
    let mut game = human_game(cross_map(&[]), 2);
    stack_decks(
        &mut game,
        &[(DeckType::Chance, chance_id(ChanceEffect::ExtraThrow))],
    );
    let outcome = game.execute(roll(0, 1, 1)).unwrap();
    assert!(outcome.events.iter().any(|e| matches!(e, GameEvent::CardDrawn { .. })));
    assert!(outcome
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::ExtraThrowGranted { player: 0 })));
    assert_eq!(game.state.budget, 2);

    game.execute(choose(0, GridKey::new(1_200, 1_000))).unwrap();
    game.execute(end(0)).unwrap();
    assert_eq!(game.state.current_player, 0);
    assert_eq!(game.state.phase, TurnPhase::RollDice);

    game.execute(roll(0, 1, 2)).unwrap();
    game.execute(choose(0, GridKey::new(1_500, 1_000))).unwrap();
    let outcome = game.execute(end(0)).unwrap();
    assert!(outcome
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::TurnAdvanced { next_player: 1 })));
}

#[test]
fn return_to_start_moves_the_player_home() {
    let mut game = human_game(cross_map(&[]), 1);
    game.execute(roll(0, 1, 2)).unwrap();
    game.execute(choose(0, GridKey::new(1_300, 1_000))).unwrap();
    game.execute(end(0)).unwrap();

    stack_decks(
        &mut game,
        &[(DeckType::Chance, chance_id(ChanceEffect::ReturnToStart))],
    );
    game.execute(roll(0, 2, 2)).unwrap();
    assert_eq!(game.state.players[0].position, CENTER);
    assert!(game.state.legal_destinations().contains(GridKey::new(1_400, 1_000)));
}

#[test]
fn missed_turns_are_skipped_on_roll() {
    let mut game = human_game(cross_map(&[]), 2);
    game.execute(
        GameAction::new(0, ActionType::ApplyChanceEffect)
            .with_payload(ActionPayload::Effect(ChanceEffect::MissTurn { turns: 1 })),
    )
    .unwrap();
    assert_eq!(game.state.players[0].missed_turns, 1);

    let outcome = game.execute(roll(0, 3, 4)).unwrap();
    assert!(outcome.events.iter().any(|e| matches!(
        e,
        GameEvent::TurnSkipped {
            player: 0,
            missed_turns_left: 0
        }
    )));
    assert_eq!(game.state.phase, TurnPhase::EndTurn);
    assert_eq!(game.state.players[0].position, CENTER);
    game.execute(end(0)).unwrap();
    assert_eq!(game.state.current_player, 1);
}

#[test]
fn obstructions_block_movement_until_removed() {
    let mut game = human_game(cross_map(&[]), 2);
    let blocked = GridKey::new(1_000, 1_200);
    let place = |cell| {
        GameAction::new(0, ActionType::PlaceObstruction).with_payload(ActionPayload::Obstruction {
            cell,
            color: TokenColor::Red,
        })
    };
    game.execute(place(blocked)).unwrap();
    assert!(matches!(
        game.execute(place(blocked)),
        Err(GameError::CellObstructed(_))
    ));
    assert!(matches!(
        game.execute(place(GridKey::new(5_000, 5_000))),
        Err(GameError::OutOfBounds(_))
    ));

    game.execute(roll(0, 1, 2)).unwrap();
    let options = game.state.legal_destinations();
    assert!(!options.contains(GridKey::new(1_000, 1_300)));
    assert!(options.contains(GridKey::new(1_000, 700)));

    let outcome = game
        .execute(
            GameAction::new(0, ActionType::RemoveObstruction)
                .with_payload(ActionPayload::Color(TokenColor::Red)),
        )
        .unwrap();
    assert!(outcome.events.iter().any(|e| matches!(
        e,
        GameEvent::ObstructionRemoved {
            color: TokenColor::Red,
            count: 1
        }
    )));
    assert!(game.state.legal_destinations().contains(GridKey::new(1_000, 1_300)));
}

#[test]
fn stuck_player_may_end_turn_after_rolling() {
    let mut game = human_game(cross_map(&[]), 2);
    // Wall in the center cell.
    for cell in [
        GridKey::new(1_000, 1_100),
        GridKey::new(1_100, 1_000),
        GridKey::new(1_000, 900),
        GridKey::new(900, 1_000),
    ] {
        game.execute(
            GameAction::new(0, ActionType::PlaceObstruction).with_payload(
                ActionPayload::Obstruction {
                    cell,
                    color: TokenColor::Green,
                },
            ),
        )
        .unwrap();
    }
    game.execute(roll(0, 1, 2)).unwrap();
    assert!(game.state.legal_destinations().is_empty());
    game.execute(end(0)).unwrap();
    assert_eq!(game.state.current_player, 1);
}

#[test]
fn end_turn_checks_reported_position() {
    let mut game = human_game(cross_map(&[]), 2);
    game.execute(roll(0, 1, 2)).unwrap();
    game.execute(choose(0, GridKey::new(700, 1_000))).unwrap();
    let err = game
        .execute(end(0).with_payload(ActionPayload::Cell(CENTER)))
        .unwrap_err();
    assert!(matches!(err, GameError::PositionMismatch { .. }));
    assert_eq!(game.state.current_player, 0);
    game.execute(end(0).with_payload(ActionPayload::Cell(GridKey::new(700, 1_000))))
        .unwrap();
    assert_eq!(game.state.current_player, 1);
    assert_eq!(game.state.turn, 1);
}

#[test]
fn visiting_every_objective_and_returning_home_wins() {
    let objective = GridKey::new(1_000, 1_300);
    let mut game = human_game(cross_map(&[objective]), 2);

    game.execute(roll(0, 1, 2)).unwrap();
    let outcome = game.execute(choose(0, objective)).unwrap();
    assert!(outcome.events.iter().any(|e| matches!(
        e,
        GameEvent::ObjectiveVisited {
            player: 0,
            objective: 0
        }
    )));
    assert!(!outcome.done);
    game.execute(end(0)).unwrap();

    game.execute(roll(1, 1, 2)).unwrap();
    game.execute(choose(1, GridKey::new(700, 1_000))).unwrap();
    game.execute(end(1)).unwrap();

    game.execute(roll(0, 1, 2)).unwrap();
    let outcome = game.execute(choose(0, CENTER)).unwrap();
    assert!(outcome.done);
    assert_eq!(game.state.status, GameStatus::Completed { winner: 0 });
    assert!(game.state.players[0].has_returned_to_start);
    assert!(matches!(game.execute(end(0)), Err(GameError::GameFinished)));
}

#[test]
fn missing_road_data_falls_back_to_grid_distance() {
    let bounds = GameBounds::new(GridKey::new(0, 0), GridKey::new(2_000, 2_000));
    let map = GameMap::new(
        bounds,
        RoadIndex::new(bounds),
        InfrastructureSites::default(),
        CENTER,
        Vec::new(),
    )
    .unwrap();
    let mut game = human_game(map, 1);
    game.execute(roll(0, 1, 2)).unwrap();

    let options = game.state.legal_destinations();
    assert!(!options.guided);
    assert!(options.cells.iter().all(|c| c.manhattan(CENTER) == 300));
    assert_eq!(options.cells.len(), 12);

    game.execute(choose(0, GridKey::new(1_100, 1_200))).unwrap();
    assert_eq!(game.state.players[0].position, GridKey::new(1_100, 1_200));
    assert_eq!(game.state.last_path.len(), 4);
}

#[test]
fn grid_fallback_walks_around_obstructions() {
    let bounds = GameBounds::new(GridKey::new(0, 0), GridKey::new(2_000, 2_000));
    let map = GameMap::new(
        bounds,
        RoadIndex::new(bounds),
        InfrastructureSites::default(),
        CENTER,
        Vec::new(),
    )
    .unwrap();
    let mut game = human_game(map, 1);
    let blocked = GridKey::new(1_100, 1_000);
    game.execute(obstruct(0, blocked)).unwrap();
    game.execute(roll(0, 1, 2)).unwrap();

    let options = game.state.legal_destinations();
    assert!(!options.guided);
    // Straight east is five steps once the way is blocked.
    let behind = GridKey::new(1_300, 1_000);
    assert!(!options.contains(behind));
    assert_eq!(options.cells.len(), 11);
    let err = game.execute(choose(0, behind)).unwrap_err();
    assert!(matches!(err, GameError::IllegalDestination(_)));
    assert_eq!(game.state.players[0].position, CENTER);

    game.execute(choose(0, GridKey::new(1_200, 1_100))).unwrap();
    assert_eq!(game.state.players[0].position, GridKey::new(1_200, 1_100));
    assert_eq!(game.state.last_path.len(), 4);
    assert!(!game.state.last_path.contains(&blocked));
}

#[test]
fn corridor_north_allows_only_its_far_end() {
    let start = GridKey::new(400_000, 300_000);
    let bounds = GameBounds::new(start.offset(-10, -10), start.offset(10, 10));
    let mut roads = RoadIndex::new(bounds);
    for dn in 0..=4 {
        roads.insert_road(start.offset(0, dn), RoadClass::B);
    }
    let map = GameMap::new(bounds, roads, InfrastructureSites::default(), start, Vec::new())
        .unwrap();
    let mut game = human_game(map, 1);
    game.execute(roll(0, 1, 3)).unwrap();

    let options = game.state.legal_destinations();
    assert_eq!(
        options.cells.into_iter().collect::<Vec<_>>(),
        vec![GridKey::new(400_000, 300_400)]
    );
    for dn in 1..4 {
        let err = game.execute(choose(0, start.offset(0, dn))).unwrap_err();
        assert!(matches!(err, GameError::IllegalDestination(_)));
    }
    game.execute(choose(0, GridKey::new(400_000, 300_400))).unwrap();
    assert_eq!(game.state.last_path.len(), 5);
}

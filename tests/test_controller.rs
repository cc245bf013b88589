use ttp_qga::{
    controller::{Action, Component, QLearning, StrategyState, NUM_ACTIONS, NUM_STATES},
    operators::StrategyPalette,
    rng::RandomNumberGenerator,
};

#[test]
fn test_state_and_action_indices_cover_the_table() {
    let mut seen = vec![false; NUM_STATES];
    for index in 0..NUM_STATES {
        let state = StrategyState::from_index(index).unwrap();
        seen[state.index()] = true;
        assert!(state.selection() < 4 && state.replacement() < 4);
    }
    assert!(seen.iter().all(|&s| s));

    for index in 0..NUM_ACTIONS {
        let action = Action::from_index(index).unwrap();
        assert_eq!(
            action.index(),
            action.component() as usize * 4 + action.slot() as usize
        );
    }
}

#[test]
fn test_greedy_choice_on_untrained_table() {
    let agent = QLearning::new(0.1, 0.95, 0.0).unwrap();
    let mut rng = RandomNumberGenerator::from_seed(42);

    for index in [0, 17, 255] {
        let state = StrategyState::from_index(index).unwrap();
        assert_eq!(agent.choose_action(state, &mut rng).index(), 0);
    }
}

#[test]
fn test_full_exploration_reaches_every_action() {
    let agent = QLearning::new(0.1, 0.95, 1.0).unwrap();
    let mut rng = RandomNumberGenerator::from_seed(5);
    let mut seen = [false; NUM_ACTIONS];

    for _ in 0..1000 {
        seen[agent.choose_action(StrategyState::default(), &mut rng).index()] = true;
    }

    assert!(seen.iter().all(|&s| s));
}

#[test]
fn test_update_changes_exactly_one_value_by_the_td_step() {
    let mut agent = QLearning::new(0.3, 0.9, 0.1).unwrap();
    let state = StrategyState::new(1, 2, 3, 0).unwrap();
    let action = Action::new(Component::Mutation, 0).unwrap();
    let next = state.apply(action);

    // Give the next state some value to bootstrap from.
    let warmup = Action::new(Component::Crossover, 3).unwrap();
    agent.update(next, warmup, 10.0, next.apply(warmup));
    let next_max = agent.table().max(next);
    assert!((next_max - 3.0).abs() < 1e-12);

    let before = agent.table().clone();
    agent.update(state, action, 2.0, next);

    let expected = 0.3 * (2.0 + 0.9 * next_max);
    assert!((agent.table().get(state, action) - expected).abs() < 1e-12);

    for s in 0..NUM_STATES {
        let s = StrategyState::from_index(s).unwrap();
        for a in 0..NUM_ACTIONS {
            let a = Action::from_index(a).unwrap();
            if (s, a) != (state, action) {
                assert_eq!(agent.table().get(s, a), before.get(s, a));
            }
        }
    }
}

#[test]
fn test_repeated_rewards_steer_the_agent() {
    let mut agent = QLearning::new(0.5, 0.9, 0.0).unwrap();
    let mut rng = RandomNumberGenerator::from_seed(9);
    let favourite = Action::new(Component::Replacement, 3).unwrap();
    let mut state = StrategyState::default();

    for _ in 0..20 {
        let next = state.apply(favourite);
        agent.update(state, favourite, 1.0, next);
        state = next;
    }

    assert_eq!(agent.choose_action(state, &mut rng), favourite);

    let names = StrategyPalette::default().names(agent.best_strategies());
    assert_eq!(names.replacement, "elitism");
}

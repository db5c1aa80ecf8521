#[cfg(test)]
mod simulation_tests {
    use cambrian_core::random_provider::scoped_seed;
    use cambrian_engine::*;

    fn small_params(grid_size: i32, pop_size: usize) -> SimParams {
        SimParams {
            grid_size,
            pop_size,
            genome_len: 8,
            steps_per_gen: 50,
            ..SimParams::default()
        }
    }

    fn reflex_gene(source: Sensor, sink: Action, weight: f32) -> Gene {
        Gene {
            source_kind: SourceKind::Sensor,
            source_index: source.index(),
            sink_kind: SinkKind::Action,
            sink_index: sink.index(),
            weight,
        }
    }

    /// Occupancy and arena must agree: every live agent owns exactly the
    /// cell it stands on, every occupied cell names a live agent there.
    fn assert_world_consistent(sim: &Simulation) {
        let grid = sim.grid();
        let mut occupied = 0;
        for x in 0..grid.size() {
            for y in 0..grid.size() {
                if let Some(id) = grid.agent_at(x, y) {
                    occupied += 1;
                    let agent = sim.agent(id).expect("grid points at a real agent");
                    assert!(agent.alive());
                    assert_eq!(agent.position(), (x, y));
                }
                let pheromone = grid.pheromone(x, y);
                assert!((0.0..=1.0).contains(&pheromone));
            }
        }
        assert_eq!(occupied, sim.live_count());
    }

    #[test]
    fn populate_fills_up_to_pop_size() {
        scoped_seed(301, || {
            let mut sim = Simulation::new(small_params(32, 200)).unwrap();
            sim.populate();

            assert!(sim.agents().len() <= 200);
            // 200 agents on 1024 cells with a 100-sample budget: every
            // placement finds a home.
            assert_eq!(sim.agents().len(), 200);
            assert_world_consistent(&sim);
        });
    }

    #[test]
    fn stepping_preserves_world_invariants() {
        scoped_seed(303, || {
            let mut sim = Simulation::new(small_params(32, 100)).unwrap();
            sim.grid_mut().set_barrier(10, 10);
            sim.grid_mut().set_barrier(10, 11);
            sim.populate();

            for _ in 0..40 {
                sim.step();
                assert_world_consistent(&sim);
                assert!(sim.grid().is_barrier(10, 10));
            }
        });
    }

    #[test]
    fn a_reflex_agent_climbs_the_location_gradient() {
        scoped_seed(305, || {
            let params = SimParams {
                grid_size: 128,
                steps_per_gen: 1000,
                pop_size: 0,
                ..SimParams::default()
            };
            let mut sim = Simulation::new(params).unwrap();

            // LocX excites hidden neuron 0; neuron 0 drives MoveX. The
            // drive saturates tanh from the second step on.
            let genome = Genome::new(vec![
                Gene {
                    source_kind: SourceKind::Sensor,
                    source_index: Sensor::LocX.index(),
                    sink_kind: SinkKind::Neuron,
                    sink_index: 0,
                    weight: 4.0,
                },
                Gene {
                    source_kind: SourceKind::Neuron,
                    source_index: 0,
                    sink_kind: SinkKind::Action,
                    sink_index: Action::MoveX.index(),
                    weight: 4.0,
                },
            ]);
            let id = sim.spawn_at(32, 64, genome).unwrap();

            for _ in 0..50 {
                sim.step();
            }

            let (x, _) = sim.agent(id).unwrap().position();
            assert!(x > 64, "reflex agent only reached x = {x}");
        });
    }

    #[test]
    fn agents_cannot_leave_the_grid() {
        scoped_seed(307, || {
            let params = SimParams {
                grid_size: 16,
                steps_per_gen: 1000,
                pop_size: 0,
                ..SimParams::default()
            };
            let mut sim = Simulation::new(params).unwrap();

            let genome = Genome::new(vec![reflex_gene(Sensor::LocX, Action::MoveX, 8.0)]);
            let id = sim.spawn_at(15, 8, genome).unwrap();

            for _ in 0..20 {
                sim.step();
                assert_eq!(sim.agent(id).unwrap().position(), (15, 8));
            }
            // A blocked agent keeps its last move; it never moved at all.
            assert_eq!(sim.agent(id).unwrap().last_move(), (0, 0));
        });
    }

    #[test]
    fn barriers_and_other_agents_block_movement() {
        scoped_seed(309, || {
            let params = SimParams {
                grid_size: 16,
                steps_per_gen: 1000,
                pop_size: 0,
                ..SimParams::default()
            };
            let mut sim = Simulation::new(params).unwrap();
            sim.grid_mut().set_barrier(9, 4);

            let driven = Genome::new(vec![reflex_gene(Sensor::LmvX, Action::MoveX, 8.0)]);
            let walled = sim.spawn_at(8, 4, driven.clone()).unwrap();
            let crowded = sim.spawn_at(8, 8, driven).unwrap();
            sim.spawn_at(9, 8, Genome::default()).unwrap();

            for _ in 0..10 {
                sim.step();
            }

            assert_eq!(sim.agent(walled).unwrap().position(), (8, 4));
            assert_eq!(sim.agent(crowded).unwrap().position(), (8, 8));
            assert_world_consistent(&sim);
        });
    }

    #[test]
    fn a_kill_needs_a_forward_victim() {
        scoped_seed(311, || {
            let params = SimParams {
                grid_size: 16,
                steps_per_gen: 1000,
                pop_size: 0,
                ..SimParams::default()
            };
            let mut sim = Simulation::new(params).unwrap();

            // LmvX reads 0.5 while still, so the kill level is tanh(2.0),
            // well over the 0.5 trigger, every step.
            let killer_genome = Genome::new(vec![reflex_gene(Sensor::LmvX, Action::Kill, 4.0)]);
            let killer = sim.spawn_at(8, 8, killer_genome).unwrap();

            // Alone: the forward cell (9, 8) is empty, nothing happens.
            for _ in 0..5 {
                sim.step();
            }
            assert!(sim.agent(killer).unwrap().alive());
            assert_eq!(sim.kills_this_gen(), 0);

            // With a bystander ahead the kill resolves immediately.
            let victim = sim.spawn_at(9, 8, Genome::default()).unwrap();
            sim.step();

            assert!(!sim.agent(victim).unwrap().alive());
            assert!(sim.agent(killer).unwrap().alive());
            assert_eq!(sim.kills_this_gen(), 1);
            assert_eq!(sim.grid().agent_at(9, 8), None);
            assert_world_consistent(&sim);
        });
    }

    #[test]
    fn an_emitter_scents_its_own_cell() {
        scoped_seed(313, || {
            let params = SimParams {
                grid_size: 16,
                steps_per_gen: 1000,
                pop_size: 0,
                ..SimParams::default()
            };
            let mut sim = Simulation::new(params).unwrap();

            let emitter = Genome::new(vec![reflex_gene(Sensor::LmvX, Action::Emit, 4.0)]);
            sim.spawn_at(8, 8, emitter).unwrap();

            for _ in 0..5 {
                sim.step();
            }
            let scent = sim.grid().pheromone(8, 8);
            assert!(scent > 0.3, "emitter left only {scent}");
            assert!(scent <= 1.0);
        });
    }

    #[test]
    fn generation_boundary_resets_the_world() {
        scoped_seed(317, || {
            let mut params = small_params(32, 60);
            params.steps_per_gen = 5;
            let mut sim = Simulation::new(params).unwrap();
            sim.grid_mut().set_barrier(3, 3);
            sim.populate();

            sim.run_generation();

            assert_eq!(sim.generation(), 2);
            assert_eq!(sim.step_in_gen(), 0);
            assert_eq!(sim.kills_this_gen(), 0);
            assert!(sim.agents().len() <= 60);
            assert!(sim.grid().is_barrier(3, 3));
            assert_world_consistent(&sim);

            // Pheromones zero after the boundary.
            for x in 0..32 {
                for y in 0..32 {
                    assert_eq!(sim.grid().pheromone(x, y), 0.0);
                }
            }
        });
    }

    #[test]
    fn extinction_recovers_with_fresh_random_agents() {
        scoped_seed(319, || {
            let mut params = small_params(32, 50);
            params.steps_per_gen = 5;
            // No safe zones anywhere: nobody survives.
            let mut sim = Simulation::new(params).unwrap();
            sim.populate();

            sim.run_generation();

            let summary = *sim.history().latest().unwrap();
            assert_eq!(summary.generation, 1);
            assert_eq!(summary.survivors, 0);
            assert_eq!(summary.species, 0);

            // The driver repopulated from scratch anyway.
            assert_eq!(sim.agents().len(), 50);
            assert!(sim.agents().iter().all(|agent| agent.alive()));
            assert_world_consistent(&sim);
        });
    }

    #[test]
    fn safe_zone_survival_concentrates_the_population() {
        scoped_seed(331, || {
            let mut params = small_params(32, 200);
            params.steps_per_gen = 100;
            let mut sim = Simulation::new(params).unwrap();

            // Right half of the world grants survival.
            for x in 16..32 {
                for y in 0..32 {
                    sim.grid_mut().set_safe(x, y, true);
                }
            }
            sim.populate();

            for _ in 0..29 {
                sim.run_generation();
            }
            // Stop just before the 30th boundary to inspect the survivors.
            for _ in 0..99 {
                sim.step();
            }

            let survivor_x = sim
                .agents()
                .iter()
                .filter(|agent| {
                    let (x, y) = agent.position();
                    agent.alive() && sim.grid().is_safe(x, y)
                })
                .map(|agent| agent.position().0 as f32)
                .collect::<Vec<f32>>();

            assert!(!survivor_x.is_empty(), "population went extinct");
            let mean = survivor_x.iter().sum::<f32>() / survivor_x.len() as f32;
            assert!(mean > 16.0, "mean survivor x = {mean}");

            // The boundary summaries recorded survivors all along.
            assert_eq!(sim.history().len(), 29);
            assert!(sim.history().latest().unwrap().survivors > 0);
        });
    }

    #[test]
    fn spawn_away_keeps_fresh_agents_off_the_safe_zone() {
        scoped_seed(337, || {
            let mut params = small_params(32, 40);
            params.spawn_away = true;
            params.spawn_margin = 2;
            let mut sim = Simulation::new(params).unwrap();
            for x in 0..8 {
                for y in 0..32 {
                    sim.grid_mut().set_safe(x, y, true);
                }
            }
            sim.populate();

            assert!(!sim.agents().is_empty());
            for agent in sim.agents() {
                let (x, _) = agent.position();
                // Safe columns end at x = 7; margin 2 pushes spawns past 9.
                assert!(x > 9, "agent spawned at x = {x}");
            }
        });
    }

    #[test]
    fn run_history_tracks_every_generation() {
        scoped_seed(341, || {
            let mut params = small_params(16, 30);
            params.steps_per_gen = 3;
            let mut sim = Simulation::new(params).unwrap();
            sim.populate();

            for _ in 0..4 {
                sim.run_generation();
            }

            assert_eq!(sim.history().len(), 4);
            let generations = sim
                .history()
                .summaries()
                .iter()
                .map(|s| s.generation)
                .collect::<Vec<u32>>();
            assert_eq!(generations, vec![1, 2, 3, 4]);
            for summary in sim.history().summaries() {
                assert!(summary.mean_genome_len > 0.0);
            }
        });
    }
}

//! Session scenarios driven through `SessionController`
//! These tests swap the HTTP transport for in-memory booth sources

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use tokio::sync::Notify;

    use crate::catalog::OrderStatus;
    use crate::gateway::{BoothSource, DataGateway, GatewayError};
    use crate::models::ChecklistSummary;
    use crate::session::{SessionController, SessionState, SessionView, Stage};
    use crate::wire::{ChecklistPayload, HealthPayload, OrdersPayload};

    /// In-memory booth service. Can fail every call, or hold the first
    /// request for one booth until `release` is called.
    #[derive(Default)]
    struct FakeSource {
        calls: AtomicUsize,
        force_flags: Mutex<Vec<bool>>,
        gated_booth: Mutex<Option<String>>,
        gate: Notify,
        fail: bool,
    }

    impl FakeSource {
        fn failing() -> Self {
            FakeSource {
                fail: true,
                ..FakeSource::default()
            }
        }

        fn gated(booth: &str) -> Self {
            FakeSource {
                gated_booth: Mutex::new(Some(booth.to_string())),
                ..FakeSource::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn release(&self) {
            self.gate.notify_one();
        }

        async fn record(&self, booth_number: &str, force_refresh: bool) -> Result<(), GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.force_flags.lock().unwrap().push(force_refresh);

            let hold = {
                let mut gated = self.gated_booth.lock().unwrap();
                if gated.as_deref() == Some(booth_number) {
                    gated.take();
                    true
                } else {
                    false
                }
            };
            if hold {
                self.gate.notified().await;
            }

            if self.fail {
                Err(GatewayError::Transport("connection refused".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl BoothSource for FakeSource {
        async fn orders(&self, booth: &str, force: bool) -> Result<OrdersPayload, GatewayError> {
            self.record(booth, force).await?;
            let payload = json!({
                "orders": [
                    {"id": format!("{booth}-1"), "item": "Round Table", "status": "delivered",
                     "exhibitor_name": format!("Exhibitor {booth}")},
                    {"id": format!("{booth}-2"), "item": "Side Chair", "status": "in-route"},
                    {"id": format!("{booth}-3"), "item": "Carpet", "status": "in-process"}
                ],
                "last_updated": "2025-06-14T08:00:00"
            });
            serde_json::from_value(payload).map_err(|e| GatewayError::Decode(e.to_string()))
        }

        async fn checklist(
            &self,
            booth: &str,
            force: bool,
        ) -> Result<ChecklistPayload, GatewayError> {
            self.record(booth, force).await?;
            let payload = json!({
                "exhibitor_name": format!("Exhibitor {booth}"),
                "section": "Section 1",
                "total_items": 3,
                "completed_items": 1,
                "items": [
                    {"name": "White Chair", "quantity": 4, "status": true},
                    {"name": "Wastebasket", "quantity": 1, "status": false},
                    {"name": "Shelving Unit", "quantity": 1, "status": false}
                ]
            });
            serde_json::from_value(payload).map_err(|e| GatewayError::Decode(e.to_string()))
        }

        async fn health(&self) -> Result<HealthPayload, GatewayError> {
            Ok(HealthPayload {
                status: Some("healthy".to_string()),
            })
        }
    }

    fn controller(source: Arc<FakeSource>) -> Arc<SessionController> {
        Arc::new(SessionController::new(DataGateway::new(source)))
    }

    async fn wait_for_calls(source: &FakeSource, expected: usize) {
        while source.calls() < expected {
            tokio::task::yield_now().await;
        }
    }

    async fn enter_booth(controller: &SessionController, booth: &str) {
        if controller.snapshot().unwrap().stage == Stage::Intro {
            controller.play_intro().await.unwrap();
        }
        let state = controller.submit_booth(booth).unwrap();
        assert_eq!(state.stage, Stage::Options);
    }

    // ===== NAVIGATION TESTS =====

    #[tokio::test(start_paused = true)]
    async fn test_intro_plays_through_to_welcome() {
        let seen: Arc<Mutex<Vec<(Stage, u8)>>> = Arc::default();
        let recorder = seen.clone();
        let controller = SessionController::new(DataGateway::new(Arc::new(FakeSource::default())))
            .with_observer(move |state: &SessionState| {
                recorder
                    .lock()
                    .unwrap()
                    .push((state.stage, state.intro_progress));
            });

        let state = controller.play_intro().await.unwrap();

        assert_eq!(state.stage, Stage::Welcome);
        let seen = seen.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                (Stage::Intro, 1),
                (Stage::Intro, 2),
                (Stage::Intro, 3),
                (Stage::Intro, 4),
                (Stage::Welcome, 4),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_welcome_blocks_blank_booth() {
        let controller = controller(Arc::new(FakeSource::default()));
        controller.play_intro().await.unwrap();

        let state = controller.submit_booth("   ").unwrap();
        assert_eq!(state.stage, Stage::Welcome);

        let state = controller.submit_booth(" A-245 ").unwrap();
        assert_eq!(state.stage, Stage::Options);
        assert_eq!(state.booth_number, "A-245");
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_navigation() {
        let controller = controller(Arc::new(FakeSource::default()));
        enter_booth(&controller, "A-245").await;
        controller.open_view(Stage::Checklist).await.unwrap();

        assert_eq!(controller.go_back().unwrap().stage, Stage::Options);
        assert_eq!(controller.go_back().unwrap().stage, Stage::Welcome);
        assert_eq!(controller.go_back().unwrap().stage, Stage::Welcome);
    }

    // ===== DATA LOADING TESTS =====

    #[tokio::test(start_paused = true)]
    async fn test_orders_view_loads_sorted_orders_and_notifications() {
        let source = Arc::new(FakeSource::default());
        let controller = controller(source.clone());
        enter_booth(&controller, "A-245").await;

        let state = controller.open_view(Stage::Orders).await.unwrap();

        assert_eq!(state.stage, Stage::Orders);
        assert!(!state.loading);
        let statuses: Vec<OrderStatus> = state.orders.iter().map(|o| o.status.clone()).collect();
        assert_eq!(
            statuses,
            vec![OrderStatus::InProcess, OrderStatus::InRoute, OrderStatus::Delivered]
        );
        assert_eq!(state.exhibitor_name, "Exhibitor A-245");
        assert_eq!(state.notifications.len(), 2);
        assert_eq!(state.notifications[0].order_id, "A-245-2");
        assert_eq!(source.force_flags.lock().unwrap().clone(), vec![false]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_checklist_view_counts_come_from_flags() {
        let controller = controller(Arc::new(FakeSource::default()));
        enter_booth(&controller, "100").await;

        let state = controller.open_view(Stage::Checklist).await.unwrap();
        let summary = ChecklistSummary::from_items(&state.checklist_items);

        assert_eq!(state.checklist_section, "Section 1");
        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.completed_items, 1);
        assert_eq!(summary.completed_items + summary.pending_items, summary.total_items);
        assert!(state.notifications.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_service_serves_demo_orders() {
        let controller = controller(Arc::new(FakeSource::failing()));
        enter_booth(&controller, "Z-999").await;
        let before = Utc::now();

        let state = controller.open_view(Stage::Orders).await.unwrap();

        assert!(!state.loading);
        assert!(!state.orders.is_empty());
        assert!(state.orders.iter().all(|o| o.id.contains("Z-999")));
        assert!(state.last_updated.unwrap() >= before);
        assert!(state.exhibitor_name.contains("Demo"));
        assert!(!state.notifications.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_snapshot_carries_identity() {
        let controller = controller(Arc::new(FakeSource::default()));
        enter_booth(&controller, "B-205").await;
        let state = controller.open_view(Stage::Orders).await.unwrap();

        let view = SessionView::from(state);
        let identity = view.identity.unwrap();
        assert_eq!(identity.section_letter, 'B');
        assert_eq!(identity.initials, "EB");
        assert_eq!(view.order_summary.total, 3);
        assert_eq!(view.order_statuses.len(), 3);
    }

    // ===== REFRESH TESTS =====

    #[tokio::test(start_paused = true)]
    async fn test_refresh_while_loading_does_not_fetch() {
        let source = Arc::new(FakeSource::gated("A-1"));
        let controller = controller(source.clone());
        enter_booth(&controller, "A-1").await;

        let pending = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.open_view(Stage::Orders).await })
        };
        wait_for_calls(&source, 1).await;
        assert!(controller.snapshot().unwrap().loading);

        let state = controller.refresh().await.unwrap();
        assert!(state.loading);
        assert_eq!(source.calls(), 1);

        source.release();
        let state = pending.await.unwrap().unwrap();
        assert!(!state.loading);
        assert_eq!(source.calls(), 1);

        let state = controller.refresh().await.unwrap();
        assert!(!state.loading);
        assert_eq!(source.calls(), 2);
        assert_eq!(source.force_flags.lock().unwrap().clone(), vec![false, true]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_outside_data_view_is_noop() {
        let source = Arc::new(FakeSource::default());
        let controller = controller(source.clone());
        enter_booth(&controller, "A-1").await;

        let state = controller.refresh().await.unwrap();
        assert_eq!(state.stage, Stage::Options);
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_reloads_checklist_with_force_flag() {
        let source = Arc::new(FakeSource::default());
        let controller = controller(source.clone());
        enter_booth(&controller, "100").await;
        controller.open_view(Stage::Checklist).await.unwrap();

        let state = controller.refresh().await.unwrap();
        assert_eq!(state.stage, Stage::Checklist);
        assert_eq!(state.checklist_items.len(), 3);
        assert_eq!(source.force_flags.lock().unwrap().clone(), vec![false, true]);
    }

    // ===== STALE RESPONSE TESTS =====

    #[tokio::test(start_paused = true)]
    async fn test_late_response_for_previous_booth_is_dropped() {
        let source = Arc::new(FakeSource::gated("A-1"));
        let controller = controller(source.clone());
        enter_booth(&controller, "A-1").await;

        let pending = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.open_view(Stage::Orders).await })
        };
        wait_for_calls(&source, 1).await;

        controller.go_back().unwrap();
        controller.go_back().unwrap();
        controller.submit_booth("B-2").unwrap();
        let state = controller.open_view(Stage::Orders).await.unwrap();
        assert!(state.orders.iter().all(|o| o.id.starts_with("B-2")));

        source.release();
        pending.await.unwrap().unwrap();

        let state = controller.snapshot().unwrap();
        assert_eq!(state.booth_number, "B-2");
        assert_eq!(state.exhibitor_name, "Exhibitor B-2");
        assert!(state.orders.iter().all(|o| o.id.starts_with("B-2")));
        assert!(state.notifications.iter().all(|n| n.order_id.starts_with("B-2")));
        assert!(!state.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_response_after_leaving_view_is_dropped() {
        let source = Arc::new(FakeSource::gated("A-1"));
        let controller = controller(source.clone());
        enter_booth(&controller, "A-1").await;

        let pending = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.open_view(Stage::Orders).await })
        };
        wait_for_calls(&source, 1).await;
        controller.go_back().unwrap();

        source.release();
        let state = pending.await.unwrap().unwrap();

        assert_eq!(state.stage, Stage::Options);
        assert!(state.orders.is_empty());
        assert!(!state.loading);
    }

    // ===== SESSION EVENT TESTS =====

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_updates_are_observed_in_order() {
        let seen: Arc<Mutex<Vec<SessionState>>> = Arc::default();
        let recorder = seen.clone();
        let controller = SessionController::new(DataGateway::new(Arc::new(FakeSource::default())))
            .with_observer(move |state: &SessionState| {
                recorder.lock().unwrap().push(state.clone());
            });
        enter_booth(&controller, "A-245").await;
        let start = seen.lock().unwrap().len();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..50 {
                        controller.go_back().unwrap();
                        controller.submit_booth("A-245").unwrap();
                    }
                });
            }
        });

        let seen = seen.lock().unwrap();
        let revisions: Vec<u64> = seen.iter().map(|state| state.revision).collect();
        assert_eq!(revisions.len(), start + 400);
        assert!(revisions.windows(2).all(|pair| pair[0] < pair[1]));

        let last = seen.last().unwrap();
        let current = controller.snapshot().unwrap();
        assert_eq!(last, &current);
    }

    #[tokio::test(start_paused = true)]
    async fn test_views_carry_increasing_revisions() {
        let controller = controller(Arc::new(FakeSource::default()));
        enter_booth(&controller, "A-245").await;

        let before = SessionView::from(controller.snapshot().unwrap());
        let after = SessionView::from(controller.open_view(Stage::Orders).await.unwrap());
        assert!(after.state.revision > before.state.revision);

        let json = serde_json::to_value(&after).unwrap();
        assert_eq!(json["revision"], after.state.revision);
        assert_eq!(json["stage"], "orders");
        assert_eq!(crate::SESSION_UPDATED_EVENT, "session://updated");
    }

    // ===== HEALTH TESTS =====

    #[tokio::test(start_paused = true)]
    async fn test_health_probe_reports_service_status() {
        let controller = controller(Arc::new(FakeSource::default()));
        let health = controller.gateway().check_health().await;
        assert!(health.reachable);
        assert_eq!(health.status, "healthy");
    }
}

use super::*;
use crate::analytics::{MockAnalyticsSink, RecordingSink};
use crate::error::{ConfigError, SubmissionError};
use crate::hubspot::MockSubmissionEndpoint;
use crate::state::{ManualClock, MemoryFields, TOTAL_STEPS};
use std::sync::atomic::{AtomicUsize, Ordering};

struct Harness {
    controller: FormController,
    sink: RecordingSink,
    clock: ManualClock,
    fields: MemoryFields,
}

impl Harness {
    fn new(endpoint: MockSubmissionEndpoint) -> Self {
        let sink = RecordingSink::new();
        let clock = ManualClock::new();
        let controller = FormController::init(
            &InitConfig::default(),
            Collaborators {
                analytics: Box::new(sink.clone()),
                endpoint: Some(Box::new(endpoint)),
                clock: Arc::new(clock.clone()),
                context: SubmissionContext {
                    hutk: "visitor42".into(),
                    page_uri: "https://bizcred.example/report".into(),
                    page_name: "Credit Report".into(),
                },
            },
        )
        .unwrap();
        Self {
            controller,
            sink,
            clock,
            fields: MemoryFields::new(),
        }
    }

    fn idle() -> Self {
        let mut endpoint = MockSubmissionEndpoint::new();
        endpoint.expect_submit().never();
        Self::new(endpoint)
    }

    /// Type into an input the way the host does: input buffer plus handler
    fn fill(&mut self, field: FieldId, value: &str) {
        self.fields.set(field, value);
        self.controller.set_field(field, value);
    }

    fn advance_and_settle(&mut self, n: u8) {
        self.controller.advance(n, &self.fields).unwrap();
        self.clock.advance(TRANSITION_OUT);
        self.controller.tick();
        self.clock.advance(TRANSITION_IN);
        self.controller.tick();
        assert!(self.controller.transition().is_none());
    }

    fn complete_entry_steps(&mut self) {
        self.fill(FieldId::FirstName, "Ada");
        self.fill(FieldId::LastName, "Lovelace");
        self.fill(FieldId::Email, "ada@example.com");
        self.fill(FieldId::Phone, "555-0100");
        self.advance_and_settle(1);

        self.fill(FieldId::Company, "Analytical Engines");
        self.controller
            .select_option(ChoiceField::FederalTaxId, Answer::Yes);
        self.advance_and_settle(2);

        self.controller
            .select_option(ChoiceField::SellsOnline, Answer::Yes);
        self.advance_and_settle(3);

        self.controller.toggle_channel("Amazon");
        self.controller.toggle_channel("Etsy");
        self.fill(FieldId::OtherPlatform, "Faire");
        self.advance_and_settle(4);

        self.fill(FieldId::MonthlyRevenue, "$25,000");
        assert_eq!(self.controller.current_step().number(), 5);
    }
}

fn step(n: u8) -> Step {
    Step::new(n).unwrap()
}

mod init {
    use super::*;

    #[test]
    fn test_init_tracks_start_and_shows_first_step() {
        let h = Harness::idle();
        assert_eq!(h.controller.current_step(), Step::FIRST);
        assert_eq!(h.sink.names(), vec!["form_start", "form_step_view"]);
        assert!(h.controller.submit_enabled());
        assert!(h.controller.error_message().is_none());
    }

    #[test]
    fn test_init_rejects_malformed_identifiers() {
        let config = InitConfig {
            portal_id: Some("portal".into()),
            ..Default::default()
        };
        let result = FormController::init(
            &config,
            Collaborators {
                analytics: Box::new(RecordingSink::new()),
                endpoint: Some(Box::new(MockSubmissionEndpoint::new())),
                clock: Arc::new(ManualClock::new()),
                context: SubmissionContext::default(),
            },
        );
        assert!(matches!(
            result,
            Err(FormError::Config(ConfigError::InvalidPortalId(_)))
        ));
    }

    #[test]
    fn test_init_applies_overrides() {
        let config = InitConfig {
            portal_id: Some("42".into()),
            form_id: Some("00000000-0000-0000-0000-000000000001".into()),
            endpoint_base: None,
        };
        let controller = FormController::init(
            &config,
            Collaborators {
                analytics: Box::new(RecordingSink::new()),
                endpoint: Some(Box::new(MockSubmissionEndpoint::new())),
                clock: Arc::new(ManualClock::new()),
                context: SubmissionContext::default(),
            },
        )
        .unwrap();
        assert!(controller
            .hubspot_config()
            .endpoint()
            .ends_with("/42/00000000-0000-0000-0000-000000000001"));
    }
}

mod show_step {
    use super::*;

    #[test]
    fn test_show_step_moves_cursor_and_tracks_view() {
        let mut h = Harness::idle();
        h.sink.clear();

        h.controller.show_step(3).unwrap();

        assert_eq!(h.controller.current_step(), step(3));
        let events = h.sink.events();
        assert_eq!(events, vec![AnalyticsEvent::StepView { step: step(3) }]);
    }

    #[test]
    fn test_show_step_out_of_range_fails_fast() {
        let mut h = Harness::idle();
        h.sink.clear();

        assert!(matches!(
            h.controller.show_step(0),
            Err(FormError::InvalidStep(0))
        ));
        assert!(matches!(
            h.controller.show_step(TOTAL_STEPS + 1),
            Err(FormError::InvalidStep(7))
        ));
        assert_eq!(h.controller.current_step(), Step::FIRST);
        assert!(h.sink.events().is_empty());
    }
}

mod validation {
    use super::*;

    #[test]
    fn test_each_entry_step_fails_once_when_empty() {
        for n in 1..=5 {
            let mut h = Harness::idle();
            h.controller.show_step(n).unwrap();
            h.sink.clear();

            assert!(!h.controller.validate_step(step(n), &MemoryFields::new()));

            assert_eq!(h.sink.count("form_validation_error"), 1, "step {n}");
            assert_eq!(h.sink.events().len(), 1, "step {n}");
            assert_eq!(h.controller.current_step(), step(n));
            assert!(h.controller.error_message().is_some());
        }
    }

    #[test]
    fn test_validation_error_event_carries_step_and_message() {
        let mut h = Harness::idle();
        h.sink.clear();
        h.fill(FieldId::FirstName, "Ada");
        h.fill(FieldId::LastName, "Lovelace");
        h.fill(FieldId::Email, "not-an-email");

        assert!(!h.controller.validate_step(Step::FIRST, &h.fields));

        assert_eq!(
            h.sink.events(),
            vec![AnalyticsEvent::ValidationError {
                step: Step::FIRST,
                message: "Please enter a valid email address".into(),
            }]
        );
    }

    #[test]
    fn test_exactly_one_validation_event_with_mock_sink() {
        let mut sink = MockAnalyticsSink::new();
        sink.expect_track()
            .withf(|e| e.name() == "form_validation_error")
            .times(1)
            .return_const(());
        sink.expect_track()
            .withf(|e| e.name() != "form_validation_error")
            .return_const(());

        let mut controller = FormController::init(
            &InitConfig::default(),
            Collaborators {
                analytics: Box::new(sink),
                endpoint: Some(Box::new(MockSubmissionEndpoint::new())),
                clock: Arc::new(ManualClock::new()),
                context: SubmissionContext::default(),
            },
        )
        .unwrap();

        controller.show_step(2).unwrap();
        assert!(!controller.validate_step(step(2), &MemoryFields::new()));
    }

    #[test]
    fn test_error_message_dismissed_after_three_seconds() {
        let mut h = Harness::idle();
        assert!(!h.controller.validate_step(Step::FIRST, &MemoryFields::new()));
        assert_eq!(
            h.controller.error_message(),
            Some("Please enter your first name")
        );

        h.clock.advance(ERROR_DISPLAY - Duration::from_millis(1));
        h.controller.tick();
        assert!(h.controller.error_message().is_some());

        h.clock.advance(Duration::from_millis(1));
        h.controller.tick();
        assert!(h.controller.error_message().is_none());
    }

    #[test]
    fn test_new_error_restarts_dismissal_window() {
        let mut h = Harness::idle();
        assert!(!h.controller.validate_step(Step::FIRST, &MemoryFields::new()));
        h.clock.advance(Duration::from_secs(2));

        h.fill(FieldId::FirstName, "Ada");
        assert!(!h.controller.validate_step(Step::FIRST, &h.fields));
        h.clock.advance(Duration::from_secs(2));
        h.controller.tick();

        assert_eq!(
            h.controller.error_message(),
            Some("Please enter your last name")
        );
    }

    #[test]
    fn test_revenue_zero_or_empty_fails_and_positive_passes() {
        let mut h = Harness::idle();
        h.controller.show_step(5).unwrap();

        h.fill(FieldId::MonthlyRevenue, "0");
        assert!(!h.controller.validate_step(step(5), &h.fields));
        h.fill(FieldId::MonthlyRevenue, "");
        assert!(!h.controller.validate_step(step(5), &h.fields));
        h.fill(FieldId::MonthlyRevenue, "500");
        assert!(h.controller.validate_step(step(5), &h.fields));
    }

    #[test]
    fn test_terminal_step_always_valid() {
        let mut h = Harness::idle();
        h.sink.clear();
        assert!(h.controller.validate_step(Step::SUCCESS, &MemoryFields::new()));
        assert!(h.sink.events().is_empty());
    }
}

mod advance {
    use super::*;

    #[test]
    fn test_failed_advance_changes_nothing() {
        let mut h = Harness::idle();
        h.sink.clear();

        let result = h.controller.advance(1, &MemoryFields::new());

        assert!(matches!(result, Err(FormError::Validation(_))));
        assert_eq!(h.controller.current_step(), Step::FIRST);
        assert!(h.controller.transition().is_none());
        assert_eq!(h.sink.names(), vec!["form_validation_error"]);
    }

    #[test]
    fn test_advance_tracks_duration_and_transitions() {
        let mut h = Harness::idle();
        h.fill(FieldId::FirstName, "Ada");
        h.fill(FieldId::LastName, "Lovelace");
        h.fill(FieldId::Email, "ada@example.com");
        h.fill(FieldId::Phone, "555-0100");
        h.clock.advance(Duration::from_millis(1200));
        h.sink.clear();

        h.controller.advance(1, &h.fields).unwrap();

        assert_eq!(
            h.sink.events(),
            vec![AnalyticsEvent::StepComplete {
                step: Step::FIRST,
                duration_ms: 1200,
            }]
        );
        assert!(matches!(
            h.controller.transition(),
            Some(Transition::Out { from, to, .. }) if from == step(1) && to == step(2)
        ));
        assert_eq!(h.controller.current_step(), Step::FIRST);

        h.clock.advance(TRANSITION_OUT);
        h.controller.tick();
        assert_eq!(h.controller.current_step(), step(2));
        assert!(matches!(
            h.controller.transition(),
            Some(Transition::In { step: s, .. }) if s == step(2)
        ));
        assert_eq!(h.sink.count("form_step_view"), 1);

        h.clock.advance(TRANSITION_IN);
        h.controller.tick();
        assert!(h.controller.transition().is_none());
    }

    #[test]
    fn test_transition_progress() {
        let now = Instant::now();
        let out = Transition::Out {
            from: step(1),
            to: step(2),
            started: now,
        };
        assert_eq!(out.progress(now), 0.0);
        assert!((out.progress(now + Duration::from_millis(150)) - 0.5).abs() < 1e-3);
        assert_eq!(out.progress(now + Duration::from_secs(5)), 1.0);
    }

    #[test]
    fn test_advance_rejected_during_transition() {
        let mut h = Harness::idle();
        h.controller
            .select_option(ChoiceField::SellsOnline, Answer::No);
        h.controller.show_step(3).unwrap();
        h.controller.advance(3, &h.fields).unwrap();

        assert!(matches!(
            h.controller.advance(3, &h.fields),
            Err(FormError::TransitionInProgress)
        ));
    }

    #[test]
    fn test_advance_requires_current_step() {
        let mut h = Harness::idle();
        assert!(matches!(
            h.controller.advance(2, &h.fields),
            Err(FormError::StepMismatch {
                requested: 2,
                current: 1
            })
        ));
    }

    #[test]
    fn test_final_entry_step_is_completed_by_submit() {
        let mut h = Harness::idle();
        h.controller.show_step(5).unwrap();
        h.fill(FieldId::MonthlyRevenue, "500");
        assert!(matches!(
            h.controller.advance(5, &h.fields),
            Err(FormError::SubmitRequired(5))
        ));
    }

    #[test]
    fn test_cannot_advance_past_terminal_step() {
        let mut h = Harness::idle();
        h.controller.show_step(6).unwrap();
        assert!(matches!(
            h.controller.advance(6, &h.fields),
            Err(FormError::InvalidStep(7))
        ));
        assert!(matches!(
            h.controller.advance(9, &h.fields),
            Err(FormError::InvalidStep(9))
        ));
    }

    #[test]
    fn test_step_change_clears_visible_error() {
        let mut h = Harness::idle();
        assert!(!h.controller.validate_step(Step::FIRST, &MemoryFields::new()));
        h.controller.show_step(2).unwrap();
        assert!(h.controller.error_message().is_none());
    }
}

mod handlers {
    use super::*;

    #[test]
    fn test_set_field_maps_inputs() {
        let mut h = Harness::idle();
        h.fill(FieldId::FirstName, "Ada");
        h.fill(FieldId::Company, "Acme");
        h.fill(FieldId::OtherPlatform, "Faire");
        let data = h.controller.data();
        assert_eq!(data.first_name, "Ada");
        assert_eq!(data.company, "Acme");
        assert_eq!(data.other_channel_text, "Faire");
    }

    #[test]
    fn test_monthly_revenue_stored_as_digits() {
        let mut h = Harness::idle();
        h.controller
            .set_field(FieldId::MonthlyRevenue, "$1,234.56");
        assert_eq!(h.controller.data().monthly_revenue_raw, "123456");
    }

    #[test]
    fn test_select_option_replaces_previous_choice() {
        let mut h = Harness::idle();
        h.controller
            .select_option(ChoiceField::FederalTaxId, Answer::Yes);
        h.controller
            .select_option(ChoiceField::FederalTaxId, Answer::Unknown);
        assert_eq!(h.controller.data().has_federal_tax_id, Some(Answer::Unknown));
        assert_eq!(h.controller.data().sells_online, None);
    }

    #[test]
    fn test_toggle_channel_is_its_own_inverse() {
        let mut h = Harness::idle();
        h.controller.toggle_channel("Shopify");
        h.fill(FieldId::OtherPlatform, "Faire");
        let before = h.controller.data().clone();

        h.controller.toggle_channel("Amazon");
        assert!(h.controller.data().selling_channels.contains("Amazon"));
        h.controller.toggle_channel("Amazon");

        assert_eq!(h.controller.data(), &before);
        assert_eq!(h.controller.data().other_channel_text, "Faire");
    }

    #[test]
    fn test_field_focus_is_tracked() {
        let mut h = Harness::idle();
        h.sink.clear();
        h.controller.track_field_focus(FieldId::Email, false);
        assert_eq!(
            h.sink.events(),
            vec![AnalyticsEvent::FieldInteraction {
                field: FieldId::Email,
                action: "focus",
                step: Step::FIRST,
                has_value: false,
            }]
        );
    }
}

mod submit {
    use super::*;

    #[tokio::test]
    async fn test_successful_submission_end_to_end() {
        let mut endpoint = MockSubmissionEndpoint::new();
        endpoint
            .expect_submit()
            .withf(|payload| {
                payload.field("email") == Some("ada@example.com")
                    && payload.field("selling_channels__c") == Some("Amazon;Etsy")
                    && payload.field("user_reported_monthly_revenue") == Some("25000")
                    && payload.context.hutk == "visitor42"
            })
            .times(1)
            .returning(|_| Ok(()));

        let mut h = Harness::new(endpoint);
        let mut completions = h.controller.subscribe();
        h.complete_entry_steps();

        h.controller.submit(&h.fields).await.unwrap();

        assert_eq!(h.controller.current_step(), Step::SUCCESS);
        assert_eq!(h.sink.count("form_submit"), 1);
        assert_eq!(h.sink.count("conversion"), 1);
        assert_eq!(h.sink.count("credit_report_conversion"), 1);
        assert!(h.controller.submit_enabled());

        let data = h.controller.data();
        assert_eq!(data.first_name, "Ada");
        assert_eq!(data.last_name, "Lovelace");
        assert_eq!(data.email, "ada@example.com");
        assert_eq!(data.phone, "555-0100");
        assert_eq!(data.company, "Analytical Engines");
        assert_eq!(data.has_federal_tax_id, Some(Answer::Yes));
        assert_eq!(data.sells_online, Some(Answer::Yes));
        assert_eq!(data.selling_channels.joined(","), "Amazon,Etsy");
        assert_eq!(data.other_channel_text, "Faire");
        assert_eq!(data.monthly_revenue_raw, "25000");

        let completion = completions.try_recv().unwrap();
        assert_eq!(&completion.data, data);
    }

    #[tokio::test]
    async fn test_conversion_event_details() {
        let mut endpoint = MockSubmissionEndpoint::new();
        endpoint.expect_submit().returning(|_| Ok(()));
        let mut h = Harness::new(endpoint);
        h.complete_entry_steps();

        h.controller.submit(&h.fields).await.unwrap();

        let conversion = h
            .sink
            .events()
            .into_iter()
            .find(|e| e.name() == "credit_report_conversion")
            .unwrap();
        let params = conversion.params();
        assert_eq!(params["user_type"], "online_seller");
        assert_eq!(params["platform"], "Amazon, Etsy");
        assert_eq!(params["has_federal_tax_id"], "yes");
        assert_eq!(params["revenue_provided"], true);
        assert_eq!(params["revenue_range"], "25k_50k");
    }

    #[tokio::test]
    async fn test_rejected_submission_keeps_state_and_reenables() {
        let mut endpoint = MockSubmissionEndpoint::new();
        endpoint.expect_submit().times(1).returning(|_| {
            Err(SubmissionError::Rejected {
                status: 400,
                message: "Invalid email".into(),
            })
        });

        let mut h = Harness::new(endpoint);
        h.complete_entry_steps();
        let before = h.controller.data().clone();

        let result = h.controller.submit(&h.fields).await;

        assert!(matches!(
            result,
            Err(FormError::Submission(SubmissionError::Rejected { status: 400, .. }))
        ));
        assert!(h.controller.submit_enabled());
        assert_eq!(h.controller.error_message(), Some(SUBMIT_ERROR_MESSAGE));
        assert_eq!(h.controller.current_step().number(), 5);
        assert_eq!(h.sink.count("conversion"), 0);
        assert_eq!(h.sink.count("form_submit"), 1);
        assert_eq!(h.controller.data(), &before);
    }

    #[tokio::test]
    async fn test_retry_after_failure_does_not_repeat_submit_event() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut endpoint = MockSubmissionEndpoint::new();
        endpoint.expect_submit().times(2).returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(SubmissionError::Network("connection reset".into()))
            } else {
                Ok(())
            }
        });

        let mut h = Harness::new(endpoint);
        h.complete_entry_steps();

        assert!(h.controller.submit(&h.fields).await.is_err());
        h.controller.submit(&h.fields).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(h.sink.count("form_submit"), 1);
        assert_eq!(h.sink.count("conversion"), 1);
        assert_eq!(h.controller.current_step(), Step::SUCCESS);
    }

    #[tokio::test]
    async fn test_invalid_revenue_never_reaches_endpoint() {
        let mut h = Harness::idle();
        h.controller.show_step(5).unwrap();
        h.fill(FieldId::MonthlyRevenue, "0");
        h.sink.clear();

        let result = h.controller.submit(&h.fields).await;

        assert!(matches!(result, Err(FormError::Validation(_))));
        assert_eq!(h.sink.names(), vec!["form_validation_error"]);
        assert!(h.controller.submit_enabled());
    }

    #[tokio::test]
    async fn test_submit_requires_final_entry_step() {
        let mut h = Harness::idle();
        h.controller.show_step(3).unwrap();
        assert!(matches!(
            h.controller.submit(&h.fields).await,
            Err(FormError::StepMismatch {
                requested: 5,
                current: 3
            })
        ));
    }
}

mod abandonment {
    use super::*;

    fn abandonment_reasons(sink: &RecordingSink) -> Vec<AbandonmentReason> {
        sink.events()
            .into_iter()
            .filter_map(|e| match e {
                AnalyticsEvent::Abandonment { reason, .. } => Some(reason),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_inactivity_timeout_fires_once() {
        let mut h = Harness::idle();
        h.clock.advance(INACTIVITY_TIMEOUT);
        h.controller.tick();
        h.clock.advance(INACTIVITY_TIMEOUT);
        h.controller.tick();

        assert_eq!(
            abandonment_reasons(&h.sink),
            vec![AbandonmentReason::InactivityTimeout]
        );
    }

    #[test]
    fn test_activity_resets_inactivity_window() {
        let mut h = Harness::idle();
        h.clock.advance(Duration::from_secs(4 * 60));
        h.controller.record_activity(Activity::Keystroke);
        h.clock.advance(Duration::from_secs(4 * 60));
        h.controller.tick();

        assert!(abandonment_reasons(&h.sink).is_empty());
    }

    #[test]
    fn test_page_hidden_and_unload_before_completion() {
        let mut h = Harness::idle();
        h.controller.show_step(2).unwrap();
        h.controller.page_hidden();
        h.controller.page_unload();

        assert_eq!(
            abandonment_reasons(&h.sink),
            vec![AbandonmentReason::PageHidden, AbandonmentReason::PageUnload]
        );
        let event = h
            .sink
            .events()
            .into_iter()
            .find(|e| e.name() == "form_abandonment")
            .unwrap();
        assert_eq!(event.params()["step_name"], "company_info");
    }

    #[test]
    fn test_no_abandonment_on_terminal_step() {
        let mut h = Harness::idle();
        h.controller.show_step(6).unwrap();
        h.controller.page_hidden();
        h.controller.page_unload();
        assert!(abandonment_reasons(&h.sink).is_empty());
    }

    #[tokio::test]
    async fn test_successful_submit_stops_inactivity_timer() {
        let mut endpoint = MockSubmissionEndpoint::new();
        endpoint.expect_submit().returning(|_| Ok(()));
        let mut h = Harness::new(endpoint);
        h.complete_entry_steps();
        h.controller.submit(&h.fields).await.unwrap();

        h.clock.advance(INACTIVITY_TIMEOUT * 2);
        h.controller.tick();
        assert!(abandonment_reasons(&h.sink).is_empty());
    }
}
